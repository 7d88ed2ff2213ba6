//! Simulated annealing with parallel restarts.
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process: worsening moves are accepted with a probability
//! that decreases over time (temperature), allowing the search to
//! escape local optima. [`SaRunner`] executes one trajectory;
//! [`ParallelSaRunner`] races rounds of independently seeded
//! trajectories forked from the best solution found so far.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Szu & Hartley (1987), "Fast Simulated Annealing"

mod config;
mod cooling;
mod parallel;
mod runner;
mod types;

pub use config::{AcceptanceBaseline, ParallelConfig, SaConfig};
pub use cooling::CoolingLaw;
pub use parallel::{ParallelSaResult, ParallelSaRunner};
pub use runner::{SaResult, SaRunner};
pub use types::{Mutation, Solution};
