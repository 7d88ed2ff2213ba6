//! Parallel-restart coordinator.

use super::config::ParallelConfig;
use super::runner::{SaResult, SaRunner};
use super::types::{Mutation, Solution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Result of a multi-round parallel run.
#[derive(Debug, Clone)]
pub struct ParallelSaResult<S> {
    /// The best solution found across all rounds.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Number of rounds executed.
    pub rounds: usize,

    /// Engine iterations summed over every worker in every round.
    pub total_iterations: usize,

    /// Global best cost after each round; index 0 is the initial
    /// solution's cost. Non-increasing.
    pub cost_history: Vec<f64>,
}

/// Races rounds of independent annealing runs, all forked from the
/// current global best.
///
/// Each round clones the global best once per worker, hands every
/// worker a seed drawn from a coordinator-owned dispenser, runs the
/// workers to their own stopping criterion, and merges their local
/// bests back in worker order, replacing the global best only on
/// strict improvement (so the lowest-indexed worker wins exact ties).
/// The run stops once `max_stagnant_rounds` consecutive rounds fail to
/// improve. Workers never share state mid-round: forks happen before
/// the round starts and the merge after every worker has finished, so
/// no locking is involved.
pub struct ParallelSaRunner;

impl ParallelSaRunner {
    /// Runs rounds until the global best stagnates.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (call
    /// [`ParallelConfig::validate`] first to get a descriptive error).
    pub fn run<S, M>(initial: S, mutation: &M, config: &ParallelConfig) -> ParallelSaResult<S>
    where
        S: Solution,
        M: Mutation<S>,
    {
        Self::run_with_observer(initial, mutation, config, |_, _| {})
    }

    /// Runs rounds, invoking `observer(round, global_best_cost)` on the
    /// coordinator thread after each round's merge.
    pub fn run_with_observer<S, M, F>(
        initial: S,
        mutation: &M,
        config: &ParallelConfig,
        mut observer: F,
    ) -> ParallelSaResult<S>
    where
        S: Solution,
        M: Mutation<S>,
        F: FnMut(usize, f64),
    {
        config.validate().expect("invalid ParallelConfig");

        let mut seed_rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let worker_config = config.worker_config();

        let mut global_best = initial;
        let mut global_best_cost = global_best.cost();
        let mut stagnant_rounds = 0usize;
        let mut rounds = 0usize;
        let mut total_iterations = 0usize;
        let mut cost_history = vec![global_best_cost];

        while stagnant_rounds < config.max_stagnant_rounds {
            // Fork one start and dispense one seed per worker before
            // any worker runs; the dispenser is the only seed source.
            let forks: Vec<_> = (0..config.num_workers)
                .map(|_| {
                    let seed: u64 = seed_rng.random();
                    (global_best.clone(), worker_config.clone().with_seed(seed))
                })
                .collect();

            let locals: Vec<SaResult<S>> = if config.parallel {
                forks
                    .into_par_iter()
                    .map(|(start, cfg)| SaRunner::run(start, mutation, &cfg))
                    .collect()
            } else {
                forks
                    .into_iter()
                    .map(|(start, cfg)| SaRunner::run(start, mutation, &cfg))
                    .collect()
            };

            // Merge in worker order, replacing on strict improvement
            // only.
            let mut improved = false;
            for local in locals {
                total_iterations += local.iterations;
                if local.best_cost < global_best_cost {
                    global_best = local.best;
                    global_best_cost = local.best_cost;
                    improved = true;
                }
            }

            if improved {
                stagnant_rounds = 0;
            } else {
                stagnant_rounds += 1;
            }
            rounds += 1;
            cost_history.push(global_best_cost);
            observer(rounds, global_best_cost);
        }

        ParallelSaResult {
            best: global_best,
            best_cost: global_best_cost,
            rounds,
            total_iterations,
            cost_history,
        }
    }
}
