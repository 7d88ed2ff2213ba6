//! Parallel simulated annealing for balanced job scheduling.
//!
//! Minimizes load imbalance when assigning independent jobs to a fixed
//! pool of identical processors. The cost of a schedule is its load
//! spread: the most-loaded processor's total minus the least-loaded
//! processor's total. A spread of 0 is a perfectly balanced schedule.
//!
//! Two layers:
//!
//! - **`sa`**: the generic annealing machinery. [`sa::Solution`] and
//!   [`sa::Mutation`] traits, pluggable cooling laws, a single-run
//!   engine ([`sa::SaRunner`]) and a multi-round parallel-restart
//!   coordinator ([`sa::ParallelSaRunner`]) that forks independently
//!   seeded searches from the global best each round and merges their
//!   results.
//! - **`scheduling`**: the concrete domain. The job-to-processor
//!   assignment encoding with incrementally maintained loads, its
//!   relocation mutation, and job-list CSV I/O.
//!
//! # Examples
//!
//! ```
//! use par_anneal::sa::{CoolingLaw, ParallelConfig, ParallelSaRunner};
//! use par_anneal::scheduling::{SchedulingMutation, SchedulingSolution};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let initial = SchedulingSolution::new(vec![5; 8], 4, &mut rng).unwrap();
//!
//! let config = ParallelConfig::default()
//!     .with_num_workers(4)
//!     .with_cooling(CoolingLaw::Cauchy { initial: 5.0 })
//!     .with_seed(42);
//!
//! let result = ParallelSaRunner::run(initial, &SchedulingMutation, &config);
//! assert_eq!(result.best_cost, 0.0);
//! ```

pub mod sa;
pub mod scheduling;
