//! Simulation scenario: path count, horizon and step size.

use shortrate_core::types::ValidationError;

/// Largest accepted path count.
pub const MAX_PATHS: usize = 10_000_000;

/// Largest accepted number of time steps.
pub const MAX_STEPS: usize = 100_000;

/// Largest accepted path table, `num_paths × (num_steps + 1)` rates (1.6 GB of `f64`).
pub const MAX_CELLS: usize = 200_000_000;

/// Validated scenario.
///
/// The horizon must be a whole number of steps: `n = round(T/dt)` with
/// `|n·dt − T| ≤ 1e-9·max(1, T)`. The grid is `t_i = i·T/n` for
/// `i = 0..=n`.
///
/// # Examples
///
/// ```rust
/// use shortrate_simulation::ScenarioDefinition;
///
/// let scenario = ScenarioDefinition::new(1_000, 2.0, 0.25).unwrap();
/// assert_eq!(scenario.num_steps(), 8);
/// assert_eq!(scenario.num_timesteps(), 9);
/// assert_eq!(scenario.time_grid().last(), Some(&2.0));
///
/// assert!(ScenarioDefinition::new(1_000, 1.0, 0.3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawScenario", into = "RawScenario")
)]
pub struct ScenarioDefinition {
    num_paths: usize,
    time_horizon: f64,
    dt: f64,
    num_steps: usize,
}

impl ScenarioDefinition {
    /// Validate and build a scenario.
    ///
    /// # Errors
    ///
    /// * `ValidationError::InvalidParameter` - zero or too many paths,
    ///   non-positive or non-finite horizon or step, `dt > time_horizon`,
    ///   more than [`MAX_STEPS`] steps, or a path table above [`MAX_CELLS`]
    /// * `ValidationError::NonDivisibleHorizon` - horizon not a whole number
    ///   of steps
    pub fn new(num_paths: usize, time_horizon: f64, dt: f64) -> Result<Self, ValidationError> {
        if num_paths == 0 || num_paths > MAX_PATHS {
            return Err(ValidationError::invalid(
                "num_paths",
                format!("{num_paths} must be between 1 and {MAX_PATHS}"),
            ));
        }
        if !(time_horizon.is_finite() && time_horizon > 0.0) {
            return Err(ValidationError::invalid(
                "time_horizon",
                format!("{time_horizon} must be positive and finite"),
            ));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ValidationError::invalid(
                "dt",
                format!("{dt} must be positive and finite"),
            ));
        }
        if dt > time_horizon {
            return Err(ValidationError::invalid(
                "dt",
                format!("{dt} exceeds the time horizon {time_horizon}"),
            ));
        }

        let steps = (time_horizon / dt).round();
        if steps > MAX_STEPS as f64 {
            return Err(ValidationError::invalid(
                "dt",
                format!("{steps} steps exceed the limit of {MAX_STEPS}"),
            ));
        }
        if (steps * dt - time_horizon).abs() > 1e-9 * time_horizon.max(1.0) {
            return Err(ValidationError::NonDivisibleHorizon { time_horizon, dt });
        }
        let num_steps = steps as usize;
        let cells = num_paths.saturating_mul(num_steps + 1);
        if cells > MAX_CELLS {
            return Err(ValidationError::invalid(
                "num_paths",
                format!(
                    "{num_paths} paths x {} grid points exceed the limit of {MAX_CELLS} rates",
                    num_steps + 1
                ),
            ));
        }

        Ok(Self {
            num_paths,
            time_horizon,
            dt,
            num_steps,
        })
    }

    /// Number of paths.
    #[inline]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Horizon in years.
    #[inline]
    pub fn time_horizon(&self) -> f64 {
        self.time_horizon
    }

    /// Requested step in years.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of Euler steps `n`.
    #[inline]
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Grid points including `t = 0`, i.e. `n + 1`.
    #[inline]
    pub fn num_timesteps(&self) -> usize {
        self.num_steps + 1
    }

    /// Step actually used, `T/n`.
    #[inline]
    pub fn step_size(&self) -> f64 {
        self.time_horizon / self.num_steps as f64
    }

    /// `t_i = i·T/n` for `i = 0..=n`; the last point is exactly `T`.
    pub fn time_grid(&self) -> Vec<f64> {
        let n = self.num_steps;
        (0..=n)
            .map(|i| {
                if i == n {
                    self.time_horizon
                } else {
                    i as f64 * self.time_horizon / n as f64
                }
            })
            .collect()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawScenario {
    num_paths: usize,
    time_horizon: f64,
    dt: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawScenario> for ScenarioDefinition {
    type Error = ValidationError;

    fn try_from(raw: RawScenario) -> Result<Self, Self::Error> {
        ScenarioDefinition::new(raw.num_paths, raw.time_horizon, raw.dt)
    }
}

#[cfg(feature = "serde")]
impl From<ScenarioDefinition> for RawScenario {
    fn from(scenario: ScenarioDefinition) -> Self {
        RawScenario {
            num_paths: scenario.num_paths,
            time_horizon: scenario.time_horizon,
            dt: scenario.dt,
        }
    }
}
