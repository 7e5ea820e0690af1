//! Simulator settings.

/// Settings for [`PathSimulator`](crate::PathSimulator).
///
/// # Examples
///
/// ```rust
/// use shortrate_simulation::SimulationConfig;
///
/// let config = SimulationConfig::default().with_seed(42).with_parallel(false);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Run seed; a fresh one is drawn from the operating system when absent.
    pub seed: Option<u64>,
    /// Generate paths across threads.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    /// Fix the run seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable parallel generation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
