//! Job-to-processor assignment encoding.

use crate::sa::Solution;
use rand::Rng;
use std::sync::Arc;

/// One assignment of independent jobs to identical processors.
///
/// Stores, per job, the index of the processor it runs on, plus the
/// per-processor load totals, which are adjusted incrementally on
/// every reassignment rather than recomputed. The duration table is
/// immutable and shared between clones, so forking a candidate copies
/// only the assignment and load vectors.
///
/// The cost is the load spread (highest processor load minus lowest);
/// a spread of 0 is a perfectly balanced schedule.
#[derive(Debug, Clone)]
pub struct SchedulingSolution {
    durations: Arc<[u32]>,
    assignment: Vec<usize>,
    loads: Vec<u64>,
}

impl SchedulingSolution {
    /// Creates a solution with a uniformly random assignment.
    ///
    /// Fails on an empty job list or a zero processor count.
    pub fn new<R: Rng>(
        durations: Vec<u32>,
        num_processors: usize,
        rng: &mut R,
    ) -> Result<Self, String> {
        if durations.is_empty() {
            return Err("at least one job is required".into());
        }
        if num_processors == 0 {
            return Err("at least one processor is required".into());
        }

        let mut loads = vec![0u64; num_processors];
        let assignment: Vec<usize> = durations
            .iter()
            .map(|&duration| {
                let processor = rng.random_range(0..num_processors);
                loads[processor] += u64::from(duration);
                processor
            })
            .collect();

        Ok(Self {
            durations: durations.into(),
            assignment,
            loads,
        })
    }

    pub fn num_jobs(&self) -> usize {
        self.assignment.len()
    }

    pub fn num_processors(&self) -> usize {
        self.loads.len()
    }

    /// Per-job durations, indexed by job.
    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    /// Processor currently running `job`.
    pub fn processor_of(&self, job: usize) -> usize {
        self.assignment[job]
    }

    /// Aggregate duration assigned to each processor.
    pub fn loads(&self) -> &[u64] {
        &self.loads
    }

    /// Load spread: the highest processor load minus the lowest.
    pub fn spread(&self) -> u64 {
        let max = self.loads.iter().copied().max().unwrap_or(0);
        let min = self.loads.iter().copied().min().unwrap_or(0);
        max - min
    }

    /// Moves `job` onto `processor`, adjusting the two affected loads.
    pub fn reassign(&mut self, job: usize, processor: usize) {
        let duration = u64::from(self.durations[job]);
        let old = self.assignment[job];
        self.loads[old] -= duration;
        self.loads[processor] += duration;
        self.assignment[job] = processor;
    }
}

impl Solution for SchedulingSolution {
    fn cost(&self) -> f64 {
        self.spread() as f64
    }
}
