//! Core traits for the annealing engine.

use rand::Rng;

/// A candidate solution the engine can search over.
///
/// The engine only needs to copy solutions and rank them by cost; the
/// domain lives entirely behind these two capabilities. `clone` must
/// produce a fully independent value, since every iteration forks a
/// disposable candidate and the coordinator forks one clone per worker
/// thread. `cost` is called once per iteration and should be cheap
/// (constant or incremental, not a full recomputation).
///
/// # Minimization
///
/// The engine minimizes the cost. For maximization, negate the cost.
pub trait Solution: Clone + Send {
    /// Cost of this solution. Lower is better.
    fn cost(&self) -> f64;
}

/// An in-place local move on a solution.
///
/// Implementations are stateless values shared across worker threads;
/// all randomness comes from the engine-owned generator passed in,
/// which keeps seed provenance in one place. The move set must keep
/// the search space connected (any solution reachable from any other
/// via a sequence of applications).
///
/// # Examples
///
/// ```ignore
/// struct SwapMutation;
///
/// impl Mutation<Vec<usize>> for SwapMutation {
///     fn apply<R: Rng>(&self, perm: &mut Vec<usize>, rng: &mut R) {
///         let i = rng.random_range(0..perm.len());
///         let j = rng.random_range(0..perm.len());
///         perm.swap(i, j);
///     }
/// }
/// ```
pub trait Mutation<S>: Send + Sync {
    /// Perturbs `solution` in place.
    fn apply<R: Rng>(&self, solution: &mut S, rng: &mut R);
}
