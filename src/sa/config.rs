//! Engine and coordinator configuration.

use super::cooling::CoolingLaw;

/// Which solution the Metropolis test measures candidates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcceptanceBaseline {
    /// Candidates are cloned from, and compared against, the single
    /// best solution the engine holds. An accepted worsening move
    /// replaces that best outright and becomes the baseline for every
    /// later comparison, so the search is a biased random walk that
    /// can ratchet upward in cost before descending again.
    BestSoFar,

    /// Textbook two-state annealer: candidates derive from a working
    /// solution that accepts moves, while the best solution ever seen
    /// is kept separately and only improves.
    Current,
}

impl Default for AcceptanceBaseline {
    fn default() -> Self {
        AcceptanceBaseline::BestSoFar
    }
}

/// Configuration for a single annealing run.
///
/// # Examples
///
/// ```
/// use par_anneal::sa::{CoolingLaw, SaConfig};
///
/// let config = SaConfig::default()
///     .with_cooling(CoolingLaw::Cauchy { initial: 500.0 })
///     .with_stagnation_limit(250)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Cooling law, carrying the initial temperature.
    pub cooling: CoolingLaw,

    /// Baseline for the Metropolis acceptance test.
    pub baseline: AcceptanceBaseline,

    /// Stop after this many consecutive iterations without progress.
    ///
    /// With [`AcceptanceBaseline::BestSoFar`], any iteration that
    /// changes the baseline cost counts as progress; rejections and
    /// cost-preserving acceptances do not. With
    /// [`AcceptanceBaseline::Current`], only a new best counts.
    pub stagnation_limit: usize,

    /// Maximum total iterations (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            cooling: CoolingLaw::default(),
            baseline: AcceptanceBaseline::default(),
            stagnation_limit: 100,
            max_iterations: 0,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_cooling(mut self, cooling: CoolingLaw) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_baseline(mut self, baseline: AcceptanceBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Budget-bound configuration: stops after `allowance` consecutive
    /// iterations without progress or `2 * allowance` iterations in
    /// total, whichever comes first. Used for time-bounded workers.
    pub fn bounded(allowance: usize) -> Self {
        Self::default()
            .with_stagnation_limit(allowance)
            .with_max_iterations(allowance.saturating_mul(2))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let t0 = self.cooling.initial_temperature();
        if !t0.is_finite() || t0 <= 0.0 {
            return Err(format!(
                "initial temperature must be positive and finite, got {t0}"
            ));
        }
        if self.stagnation_limit == 0 {
            return Err("stagnation_limit must be at least 1".into());
        }
        Ok(())
    }
}

/// Configuration for the parallel restart coordinator.
///
/// # Examples
///
/// ```
/// use par_anneal::sa::{CoolingLaw, ParallelConfig};
///
/// let config = ParallelConfig::default()
///     .with_num_workers(8)
///     .with_cooling(CoolingLaw::Boltzmann { initial: 100.0 })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelConfig {
    /// Number of workers forked from the global best each round.
    pub num_workers: usize,

    /// Stop after this many consecutive rounds in which no worker
    /// strictly improved the global best.
    pub max_stagnant_rounds: usize,

    /// Per-worker stagnation limit (see [`SaConfig::stagnation_limit`]).
    /// Ignored when `worker_iterations` is set.
    pub stagnation_limit: usize,

    /// Per-worker iteration allowance. `Some(n)` runs every worker
    /// with a stagnation limit of `n` and a hard cap of `2 * n`
    /// iterations, bounding round length for scaling studies.
    pub worker_iterations: Option<usize>,

    /// Cooling law shared by every worker.
    pub cooling: CoolingLaw,

    /// Acceptance baseline shared by every worker.
    pub baseline: AcceptanceBaseline,

    /// Run workers on the rayon thread pool. `false` runs them
    /// sequentially on the calling thread; results are identical for
    /// a fixed seed either way.
    pub parallel: bool,

    /// Seed for the coordinator's seed dispenser. A fixed value makes
    /// the entire run reproducible.
    pub seed: Option<u64>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: 4,
            max_stagnant_rounds: 10,
            stagnation_limit: 100,
            worker_iterations: None,
            cooling: CoolingLaw::default(),
            baseline: AcceptanceBaseline::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl ParallelConfig {
    pub fn with_num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn with_max_stagnant_rounds(mut self, n: usize) -> Self {
        self.max_stagnant_rounds = n;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_worker_iterations(mut self, n: usize) -> Self {
        self.worker_iterations = Some(n);
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingLaw) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_baseline(mut self, baseline: AcceptanceBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Engine configuration each worker runs with, before seeding.
    pub(crate) fn worker_config(&self) -> SaConfig {
        let base = SaConfig::default()
            .with_cooling(self.cooling)
            .with_baseline(self.baseline);
        match self.worker_iterations {
            Some(n) => base
                .with_stagnation_limit(n)
                .with_max_iterations(n.saturating_mul(2)),
            None => base.with_stagnation_limit(self.stagnation_limit),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_workers == 0 {
            return Err("num_workers must be at least 1".into());
        }
        if self.max_stagnant_rounds == 0 {
            return Err("max_stagnant_rounds must be at least 1".into());
        }
        if self.worker_iterations == Some(0) {
            return Err("worker_iterations must be at least 1".into());
        }
        self.worker_config().validate()
    }
}
