//! Calibration settings.

use crate::error::CalibrationError;
use shortrate_core::math::solvers::{LMConfig, NelderMeadConfig};
use shortrate_models::instruments::rates::JamshidianConfig;
use shortrate_models::models::rates::FitterConfig;
use std::time::Duration;

/// Mean-reversion values of the default start grid.
pub const DEFAULT_MEAN_REVERSION_STARTS: [f64; 3] = [0.03, 0.1, 0.3];

/// Volatility values of the default start grid.
pub const DEFAULT_VOLATILITY_STARTS: [f64; 3] = [0.005, 0.01, 0.02];

/// Settings for [`HullWhiteCalibrator`](super::HullWhiteCalibrator).
///
/// Every field has a usable default; adjust with the `with_*` builders.
///
/// # Example
///
/// ```
/// use shortrate_optimiser::CalibrationConfig;
/// use std::time::Duration;
///
/// let config = CalibrationConfig::default()
///     .with_max_iterations(200)
///     .with_time_limit(Duration::from_secs(5))
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.start_points.len(), 9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalibrationConfig {
    /// Search interval for mean reversion `a`.
    pub mean_reversion_bounds: (f64, f64),
    /// Search interval for volatility `σ`.
    pub volatility_bounds: (f64, f64),
    /// Starting `(a, σ)` pairs, tried in order.
    pub start_points: Vec<(f64, f64)>,
    /// Hold `a` at this value and search `σ` only.
    pub fixed_mean_reversion: Option<f64>,
    /// Objective contribution of an instrument that fails to price.
    pub pricing_failure_penalty: f64,
    /// Wall-clock budget in seconds for the whole search.
    pub time_limit_secs: Option<f64>,
    /// Run a Levenberg-Marquardt polish after the simplex search.
    pub polish: bool,
    /// Price the basket across threads.
    pub parallel: bool,
    /// Simplex settings; `max_iterations` applies per start.
    pub nelder_mead: NelderMeadConfig,
    /// Polish settings.
    pub levenberg_marquardt: LMConfig,
    /// Drift table settings.
    pub fitter: FitterConfig,
    /// Critical-rate search settings.
    pub jamshidian: JamshidianConfig,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        let start_points = DEFAULT_MEAN_REVERSION_STARTS
            .iter()
            .flat_map(|&a| DEFAULT_VOLATILITY_STARTS.iter().map(move |&s| (a, s)))
            .collect();
        Self {
            mean_reversion_bounds: (1e-4, 5.0),
            volatility_bounds: (1e-5, 1.0),
            start_points,
            fixed_mean_reversion: None,
            pricing_failure_penalty: 1e6,
            time_limit_secs: None,
            polish: true,
            parallel: true,
            nelder_mead: NelderMeadConfig::default(),
            levenberg_marquardt: LMConfig::default(),
            fitter: FitterConfig::default(),
            jamshidian: JamshidianConfig::default(),
        }
    }
}

impl CalibrationConfig {
    /// Set the mean-reversion search interval.
    pub fn with_mean_reversion_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.mean_reversion_bounds = (lower, upper);
        self
    }

    /// Set the volatility search interval.
    pub fn with_volatility_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.volatility_bounds = (lower, upper);
        self
    }

    /// Replace the start points.
    pub fn with_start_points(mut self, start_points: Vec<(f64, f64)>) -> Self {
        self.start_points = start_points;
        self
    }

    /// Calibrate `σ` only, with `a` held fixed.
    pub fn with_fixed_mean_reversion(mut self, mean_reversion: f64) -> Self {
        self.fixed_mean_reversion = Some(mean_reversion);
        self
    }

    /// Set the per-instrument pricing failure penalty.
    pub fn with_pricing_failure_penalty(mut self, penalty: f64) -> Self {
        self.pricing_failure_penalty = penalty;
        self
    }

    /// Set the iteration cap of each simplex run and of the polish.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.nelder_mead.max_iterations = max_iterations;
        self.levenberg_marquardt.max_iterations = max_iterations;
        self
    }

    /// Set the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = Some(limit.as_secs_f64());
        self
    }

    /// Enable or disable the Levenberg-Marquardt polish.
    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }

    /// Enable or disable parallel basket pricing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the drift table settings.
    pub fn with_fitter(mut self, fitter: FitterConfig) -> Self {
        self.fitter = fitter;
        self
    }

    /// Set the critical-rate search settings.
    pub fn with_jamshidian(mut self, jamshidian: JamshidianConfig) -> Self {
        self.jamshidian = jamshidian;
        self
    }

    /// Wall-clock budget, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Check bounds, start points, penalty and budgets.
    ///
    /// # Errors
    ///
    /// `CalibrationError::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        check_bounds("mean_reversion_bounds", self.mean_reversion_bounds)?;
        check_bounds("volatility_bounds", self.volatility_bounds)?;

        if self.start_points.is_empty() {
            return Err(invalid("start_points must not be empty"));
        }
        for (i, &(a, sigma)) in self.start_points.iter().enumerate() {
            if !(is_positive(a) && is_positive(sigma)) {
                return Err(invalid(format!(
                    "start point {i} = ({a}, {sigma}) must be positive and finite"
                )));
            }
        }
        if let Some(a) = self.fixed_mean_reversion {
            if !is_positive(a) {
                return Err(invalid(format!(
                    "fixed_mean_reversion = {a} must be positive and finite"
                )));
            }
        }
        if !is_positive(self.pricing_failure_penalty) {
            return Err(invalid(format!(
                "pricing_failure_penalty = {} must be positive and finite",
                self.pricing_failure_penalty
            )));
        }
        if let Some(secs) = self.time_limit_secs {
            if !is_positive(secs) {
                return Err(invalid(format!(
                    "time_limit_secs = {secs} must be positive and finite"
                )));
            }
        }
        if self.nelder_mead.max_iterations == 0 {
            return Err(invalid("nelder_mead.max_iterations must be at least 1"));
        }
        self.fitter
            .validate()
            .map_err(|e| invalid(format!("fitter: {e}")))?;
        Ok(())
    }
}

fn check_bounds(name: &str, (lower, upper): (f64, f64)) -> Result<(), CalibrationError> {
    if is_positive(lower) && upper.is_finite() && lower < upper {
        Ok(())
    } else {
        Err(invalid(format!(
            "{name} = ({lower}, {upper}) must satisfy 0 < lower < upper < inf"
        )))
    }
}

#[inline]
fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn invalid(reason: impl Into<String>) -> CalibrationError {
    CalibrationError::InvalidConfig(reason.into())
}
