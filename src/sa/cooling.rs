//! Cooling laws mapping iteration indices to temperatures.

/// Cooling law for temperature reduction.
///
/// Unlike step-based schedules that derive `T_{k+1}` from `T_k`, each
/// law is a pure function of the iteration index, so the engine can
/// evaluate it statelessly every iteration. All variants carry their
/// initial temperature `T_0 > 0`.
///
/// # References
///
/// - Boltzmann: Geman & Geman (1984), logarithmic annealing
/// - Cauchy: Szu & Hartley (1987), "Fast Simulated Annealing"
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingLaw {
    /// Boltzmann cooling: `T_k = T_0 / ln(1 + k)`.
    ///
    /// Slowest decay. Note that `T_1 = T_0 / ln 2` exceeds `T_0`; the
    /// sequence decreases strictly from iteration 1 onward.
    Boltzmann {
        /// Initial temperature. Higher values allow more exploration.
        initial: f64,
    },

    /// Cauchy cooling: `T_k = T_0 / (1 + k)`.
    ///
    /// Hyperbolic decay, much faster than Boltzmann.
    Cauchy {
        /// Initial temperature.
        initial: f64,
    },

    /// Log-Cauchy cooling: `T_k = T_0 * ln(1 + k) / (1 + k)`.
    ///
    /// Rises to its peak near iteration 2 (`ln(x)/x` peaks at `x = e`),
    /// then decays faster than Boltzmann but slower than Cauchy.
    LogCauchy {
        /// Initial temperature.
        initial: f64,
    },
}

impl CoolingLaw {
    /// The configured initial temperature `T_0`, used by the engine
    /// before the first cooling step.
    pub fn initial_temperature(&self) -> f64 {
        match *self {
            CoolingLaw::Boltzmann { initial }
            | CoolingLaw::Cauchy { initial }
            | CoolingLaw::LogCauchy { initial } => initial,
        }
    }

    /// Temperature after `iteration` completed iterations.
    ///
    /// Indices below 1 are clamped to 1, so the Boltzmann law never
    /// divides by `ln(1) = 0` when the first iteration cools.
    pub fn temperature(&self, iteration: usize) -> f64 {
        let k = iteration.max(1) as f64;
        match *self {
            CoolingLaw::Boltzmann { initial } => initial / (1.0 + k).ln(),
            CoolingLaw::Cauchy { initial } => initial / (1.0 + k),
            CoolingLaw::LogCauchy { initial } => initial * (1.0 + k).ln() / (1.0 + k),
        }
    }
}

impl Default for CoolingLaw {
    fn default() -> Self {
        CoolingLaw::Boltzmann { initial: 100.0 }
    }
}
