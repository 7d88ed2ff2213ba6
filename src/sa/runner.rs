//! Single-run annealing engine.

use super::config::{AcceptanceBaseline, SaConfig};
use super::types::{Mutation, Solution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Result of a single annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Total number of iterations (candidate evaluations).
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,
}

/// Executes a single annealing run.
///
/// # Usage
///
/// ```ignore
/// let initial = SchedulingSolution::new(durations, processors, &mut rng)?;
/// let config = SaConfig::default().with_seed(42);
/// let result = SaRunner::run(initial, &SchedulingMutation, &config);
/// println!("best cost: {}", result.best_cost);
/// ```
pub struct SaRunner;

impl SaRunner {
    /// Runs the annealing loop from `initial`.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (call [`SaConfig::validate`]
    /// first to get a descriptive error).
    pub fn run<S, M>(initial: S, mutation: &M, config: &SaConfig) -> SaResult<S>
    where
        S: Solution,
        M: Mutation<S>,
    {
        config.validate().expect("invalid SaConfig");

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        match config.baseline {
            AcceptanceBaseline::BestSoFar => {
                anneal_single_state(initial, mutation, config, &mut rng)
            }
            AcceptanceBaseline::Current => anneal_two_state(initial, mutation, config, &mut rng),
        }
    }
}

/// Single-state loop: the running best is also the point candidates are
/// generated from. An accepted worsening move replaces it and restarts
/// the descent from there.
///
/// The stagnation counter counts consecutive iterations that left the
/// baseline cost unchanged (rejections and cost-equal acceptances);
/// any acceptance that changes the cost resets it.
fn anneal_single_state<S, M, R>(
    initial: S,
    mutation: &M,
    config: &SaConfig,
    rng: &mut R,
) -> SaResult<S>
where
    S: Solution,
    M: Mutation<S>,
    R: Rng,
{
    let mut best = initial;
    let mut best_cost = best.cost();

    let mut temperature = config.cooling.initial_temperature();
    let mut iterations = 0usize;
    let mut stagnant = 0usize;
    let mut accepted_moves = 0usize;
    let mut improving_moves = 0usize;

    while stagnant < config.stagnation_limit && within_budget(config, iterations) {
        let mut candidate = best.clone();
        mutation.apply(&mut candidate, rng);
        let candidate_cost = candidate.cost();

        if candidate_cost < best_cost {
            best = candidate;
            best_cost = candidate_cost;
            accepted_moves += 1;
            improving_moves += 1;
            stagnant = 0;
        } else if metropolis(candidate_cost - best_cost, temperature, rng) {
            let worsened = candidate_cost > best_cost;
            best = candidate;
            best_cost = candidate_cost;
            accepted_moves += 1;
            if worsened {
                stagnant = 0;
            } else {
                stagnant += 1;
            }
        } else {
            stagnant += 1;
        }

        // End-of-iteration cooling with the pre-increment index; the
        // law clamps index 0 to 1.
        temperature = config.cooling.temperature(iterations);
        iterations += 1;
    }

    SaResult {
        best,
        best_cost,
        iterations,
        accepted_moves,
        improving_moves,
        final_temperature: temperature,
    }
}

/// Two-state loop: a working solution accepts moves while the best
/// solution ever seen is tracked separately and only improves. The
/// stagnation counter counts consecutive iterations without a new best.
fn anneal_two_state<S, M, R>(
    initial: S,
    mutation: &M,
    config: &SaConfig,
    rng: &mut R,
) -> SaResult<S>
where
    S: Solution,
    M: Mutation<S>,
    R: Rng,
{
    let mut current = initial;
    let mut current_cost = current.cost();
    let mut best = current.clone();
    let mut best_cost = current_cost;

    let mut temperature = config.cooling.initial_temperature();
    let mut iterations = 0usize;
    let mut stagnant = 0usize;
    let mut accepted_moves = 0usize;
    let mut improving_moves = 0usize;

    while stagnant < config.stagnation_limit && within_budget(config, iterations) {
        let mut candidate = current.clone();
        mutation.apply(&mut candidate, rng);
        let candidate_cost = candidate.cost();

        let accept = if candidate_cost < current_cost {
            improving_moves += 1;
            true
        } else {
            metropolis(candidate_cost - current_cost, temperature, rng)
        };

        if accept {
            current = candidate;
            current_cost = candidate_cost;
            accepted_moves += 1;
        }

        if current_cost < best_cost {
            best = current.clone();
            best_cost = current_cost;
            stagnant = 0;
        } else {
            stagnant += 1;
        }

        temperature = config.cooling.temperature(iterations);
        iterations += 1;
    }

    SaResult {
        best,
        best_cost,
        iterations,
        accepted_moves,
        improving_moves,
        final_temperature: temperature,
    }
}

/// Metropolis test for a non-improving candidate (`delta >= 0`): accept
/// when a uniform [0,1) draw lands at or below `exp(-delta / T)`. A zero
/// delta always accepts, letting the search drift across cost plateaus.
fn metropolis<R: Rng>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    let probability = (-delta / temperature).exp();
    rng.random_range(0.0..1.0) <= probability
}

fn within_budget(config: &SaConfig, iterations: usize) -> bool {
    config.max_iterations == 0 || iterations < config.max_iterations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sa::CoolingLaw;
    use crate::scheduling::{generate_jobs, SchedulingMutation, SchedulingSolution};

    // ---- Integer walk: minimize |x|, unit steps ----

    #[derive(Debug, Clone)]
    struct Walk {
        x: i64,
    }

    impl Solution for Walk {
        fn cost(&self) -> f64 {
            self.x.abs() as f64
        }
    }

    struct StepMutation;

    impl Mutation<Walk> for StepMutation {
        fn apply<R: Rng>(&self, solution: &mut Walk, rng: &mut R) {
            solution.x += if rng.random_bool(0.5) { 1 } else { -1 };
        }
    }

    #[test]
    fn test_walk_descends_to_zero() {
        let config = SaConfig::default()
            .with_cooling(CoolingLaw::Cauchy { initial: 10.0 })
            .with_stagnation_limit(2000)
            .with_seed(42);

        let result = SaRunner::run(Walk { x: 10 }, &StepMutation, &config);

        assert_eq!(
            result.best_cost, 0.0,
            "expected the walk to reach 0, got {}",
            result.best_cost
        );
        assert!(result.improving_moves > 0);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let config = SaConfig::default()
            .with_cooling(CoolingLaw::Cauchy { initial: 5.0 })
            .with_stagnation_limit(300)
            .with_seed(7);

        let a = SaRunner::run(Walk { x: 25 }, &StepMutation, &config);
        let b = SaRunner::run(Walk { x: 25 }, &StepMutation, &config);

        assert_eq!(a.best_cost, b.best_cost);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.accepted_moves, b.accepted_moves);
        assert_eq!(a.improving_moves, b.improving_moves);
    }

    #[test]
    fn test_cold_run_accepts_only_improvements() {
        // Near-zero temperature kills every uphill acceptance, so the
        // baseline cost can only descend.
        let config = SaConfig::default()
            .with_cooling(CoolingLaw::Cauchy { initial: 1e-9 })
            .with_stagnation_limit(500)
            .with_seed(42);

        let result = SaRunner::run(Walk { x: 10 }, &StepMutation, &config);

        assert_eq!(result.accepted_moves, result.improving_moves);
        assert_eq!(result.best_cost, 0.0);
    }

    #[test]
    fn test_hot_run_accepts_uphill() {
        let config = SaConfig::default()
            .with_cooling(CoolingLaw::Boltzmann { initial: 1e9 })
            .with_stagnation_limit(10_000)
            .with_max_iterations(2000)
            .with_seed(42);

        let result = SaRunner::run(Walk { x: 0 }, &StepMutation, &config);

        assert_eq!(result.iterations, 2000, "hot run should stop at the cap");
        let acceptance_ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(
            acceptance_ratio > 0.95,
            "expected near-total acceptance at extreme temperature, got {acceptance_ratio}"
        );
    }

    #[test]
    fn test_stagnation_terminates_at_local_minimum() {
        // From x = 0 every candidate is worse and the temperature is far
        // too low to accept it, so the run lasts exactly the limit.
        let config = SaConfig::default()
            .with_cooling(CoolingLaw::Cauchy { initial: 1e-12 })
            .with_stagnation_limit(50)
            .with_seed(3);

        let result = SaRunner::run(Walk { x: 0 }, &StepMutation, &config);

        assert_eq!(result.iterations, 50);
        assert_eq!(result.accepted_moves, 0);
        assert_eq!(result.best_cost, 0.0);
    }

    #[test]
    fn test_bounded_config_respects_cap() {
        let config = SaConfig::bounded(100)
            .with_cooling(CoolingLaw::Boltzmann { initial: 1e9 })
            .with_seed(42);

        let result = SaRunner::run(Walk { x: 0 }, &StepMutation, &config);

        assert!(
            result.iterations <= 200,
            "expected at most 2 * allowance iterations, got {}",
            result.iterations
        );
    }

    #[test]
    fn test_two_state_tracks_best_separately() {
        let config = SaConfig::default()
            .with_baseline(AcceptanceBaseline::Current)
            .with_cooling(CoolingLaw::Cauchy { initial: 5.0 })
            .with_stagnation_limit(500)
            .with_seed(42);

        let result = SaRunner::run(Walk { x: 10 }, &StepMutation, &config);

        assert_eq!(result.best_cost, 0.0);
        assert!(result.accepted_moves >= result.improving_moves);
    }

    // ---- Scheduling scenarios ----

    #[test]
    fn test_balances_four_jobs_on_two_processors() {
        // Durations [1, 2, 3, 4] split as {1, 4} and {2, 3}: spread 0.
        let mut rng = StdRng::seed_from_u64(7);
        let initial =
            SchedulingSolution::new(vec![1, 2, 3, 4], 2, &mut rng).expect("valid instance");

        let config = SaConfig::default()
            .with_cooling(CoolingLaw::Cauchy { initial: 10.0 })
            .with_stagnation_limit(500)
            .with_seed(42);

        let result = SaRunner::run(initial, &SchedulingMutation, &config);

        assert_eq!(
            result.best_cost, 0.0,
            "expected a perfect split, got {}",
            result.best_cost
        );
    }

    #[test]
    fn test_single_job_single_processor_terminates() {
        // The mutation is a no-op, so every candidate is cost-equal and
        // accepted; the stagnation counter must still advance.
        let mut rng = StdRng::seed_from_u64(1);
        let initial = SchedulingSolution::new(vec![5], 1, &mut rng).expect("valid instance");

        let config = SaConfig::default()
            .with_cooling(CoolingLaw::Boltzmann { initial: 100.0 })
            .with_stagnation_limit(80)
            .with_seed(42);

        let result = SaRunner::run(initial, &SchedulingMutation, &config);

        assert_eq!(result.best_cost, 0.0);
        assert_eq!(result.iterations, 80);
        assert_eq!(result.accepted_moves, 80);
        assert_eq!(result.improving_moves, 0);
    }

    #[test]
    fn test_hot_run_stops_at_cap_not_stagnation() {
        // Boltzmann at 1000 is still above 130 after two thousand
        // iterations, so uphill moves keep getting accepted and a long
        // streak of cost-preserving iterations never forms. The
        // iteration cap is the only stopping rule that can fire.
        let mut rng = StdRng::seed_from_u64(5);
        let durations = generate_jobs(40, 1, 100, &mut rng);
        let initial = SchedulingSolution::new(durations, 4, &mut rng).expect("valid instance");

        let config = SaConfig::bounded(1000)
            .with_cooling(CoolingLaw::Boltzmann { initial: 1000.0 })
            .with_seed(42);

        let result = SaRunner::run(initial, &SchedulingMutation, &config);

        assert_eq!(
            result.iterations, 2000,
            "expected the cap to end the run, not stagnation"
        );
        assert!(result.final_temperature > 100.0);
    }

    #[test]
    fn test_two_state_result_never_worse_than_initial() {
        // The two-state best starts at the initial solution and is only
        // replaced on strict improvement, so it can never regress.
        let mut rng = StdRng::seed_from_u64(9);
        let initial = SchedulingSolution::new(vec![13, 2, 40, 7, 19, 5, 28, 1], 3, &mut rng)
            .expect("valid instance");
        let initial_cost = initial.cost();

        let config = SaConfig::default()
            .with_baseline(AcceptanceBaseline::Current)
            .with_cooling(CoolingLaw::LogCauchy { initial: 50.0 })
            .with_stagnation_limit(200)
            .with_seed(42);

        let result = SaRunner::run(initial, &SchedulingMutation, &config);

        assert!(
            result.best_cost <= initial_cost,
            "final cost {} exceeds initial cost {initial_cost}",
            result.best_cost
        );
    }
}
