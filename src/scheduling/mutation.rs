//! Local move: relocate one job to another processor.

use super::solution::SchedulingSolution;
use crate::sa::Mutation;
use rand::Rng;

/// Moves one uniformly chosen job to a uniformly chosen *different*
/// processor, resampling the target until it differs from the job's
/// current one. On a single-processor instance no alternative target
/// exists and the move degenerates to a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulingMutation;

impl Mutation<SchedulingSolution> for SchedulingMutation {
    fn apply<R: Rng>(&self, solution: &mut SchedulingSolution, rng: &mut R) {
        let num_processors = solution.num_processors();
        if num_processors < 2 {
            return;
        }

        let job = rng.random_range(0..solution.num_jobs());
        let current = solution.processor_of(job);
        let mut target = rng.random_range(0..num_processors);
        while target == current {
            target = rng.random_range(0..num_processors);
        }
        solution.reassign(job, target);
    }
}
