//! Balanced job scheduling on identical processors.
//!
//! The optimization problem: assign independent, unsplittable jobs to a
//! fixed pool of identical processors so that the load spread (highest
//! processor load minus lowest) is as small as possible. A spread of 0
//! is a perfectly balanced schedule. [`SchedulingSolution`] and
//! [`SchedulingMutation`] plug this domain into the annealing engine;
//! [`load_jobs`], [`generate_jobs`] and [`write_jobs`] handle the
//! job-list CSV format.

mod jobs;
mod mutation;
mod solution;

pub use jobs::{generate_jobs, load_jobs, write_jobs};
pub use mutation::SchedulingMutation;
pub use solution::SchedulingSolution;
