//! Monte Carlo diagnostics against the model's closed forms.
//!
//! - [`martingale_check`]: `E[D(0,t)·P(t,T,r_t)]` should equal `P(0,T)`
//! - [`moment_check`]: sample mean and variance of `r(t)` against the
//!   analytic Gaussian moments

use crate::result::{mean_and_variance, SimulationResult};
use shortrate_core::market_data::curves::YieldCurve;
use shortrate_core::types::ValidationError;
use shortrate_models::models::rates::CalibratedModel;

/// Outcome of [`martingale_check`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MartingaleCheck {
    /// Observation time `t`.
    pub time: f64,
    /// Bond maturity `T`.
    pub maturity: f64,
    /// Path average of `D(0,t)·P(t,T,r_t)`.
    pub mean: f64,
    /// Standard error of `mean`.
    pub std_error: f64,
    /// `P(0,T)` from the initial curve.
    pub analytic: f64,
}

impl MartingaleCheck {
    /// `mean − analytic`.
    #[inline]
    pub fn deviation(&self) -> f64 {
        self.mean - self.analytic
    }

    /// Deviation in units of the standard error; zero when both vanish.
    pub fn z_score(&self) -> f64 {
        let dev = self.deviation();
        if self.std_error > 0.0 {
            dev / self.std_error
        } else if dev == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    }
}

/// Outcome of [`moment_check`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MomentCheck {
    /// Grid time.
    pub time: f64,
    /// Sample mean of `r(t)`.
    pub sample_mean: f64,
    /// Sample variance of `r(t)`.
    pub sample_variance: f64,
    /// Analytic `E[r(t)]`.
    pub analytic_mean: f64,
    /// Analytic `Var[r(t)]`.
    pub analytic_variance: f64,
    /// Standard error of the sample mean.
    pub std_error: f64,
}

/// Discounted bond average at grid point `step` for a bond maturing at
/// `maturity`.
///
/// # Errors
///
/// `ValidationError::InvalidParameter` if `step` is off the grid or
/// `maturity` precedes the observation time.
///
/// # Examples
///
/// ```rust
/// use shortrate_core::market_data::curves::DiscountCurve;
/// use shortrate_models::models::rates::{CalibratedModel, FitterConfig, HullWhiteParams};
/// use shortrate_simulation::{martingale_check, PathSimulator, ScenarioDefinition, SimulationConfig};
///
/// let curve = DiscountCurve::flat(0.03, &[1.0, 10.0]).unwrap();
/// let params = HullWhiteParams::new(0.1, 0.01).unwrap();
/// let model = CalibratedModel::fit(params, curve, &FitterConfig::default(), 0.0).unwrap();
///
/// let scenario = ScenarioDefinition::new(2_000, 1.0, 1.0 / 52.0).unwrap();
/// let result = PathSimulator::new(SimulationConfig::default().with_seed(1))
///     .simulate(&model, &scenario, None)
///     .unwrap();
///
/// let check = martingale_check(&model, &result, 52, 5.0).unwrap();
/// assert!(check.z_score().abs() < 5.0);
/// ```
pub fn martingale_check(
    model: &CalibratedModel,
    result: &SimulationResult,
    step: usize,
    maturity: f64,
) -> Result<MartingaleCheck, ValidationError> {
    let time = grid_time(result, step)?;
    if !(maturity.is_finite() && maturity >= time) {
        return Err(ValidationError::invalid(
            "maturity",
            format!("{maturity} must be finite and not before t = {time}"),
        ));
    }

    let view = model.model();
    let discounts = result.discount_factors(step).unwrap_or_default();
    let rates = result.rates_at(step).unwrap_or_default();
    let discounted = discounts
        .iter()
        .zip(&rates)
        .map(|(d, &r)| view.bond_price(time, maturity, r).map(|p| d * p))
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| ValidationError::invalid("maturity", e.to_string()))?;
    let analytic = model
        .curve()
        .discount_factor(maturity)
        .map_err(|e| ValidationError::invalid("maturity", e.to_string()))?;

    let (mean, variance) = mean_and_variance(&discounted);
    Ok(MartingaleCheck {
        time,
        maturity,
        mean,
        std_error: (variance / discounted.len() as f64).sqrt(),
        analytic,
    })
}

/// Sample moments of `r(t_step)` next to the analytic ones.
///
/// # Errors
///
/// `ValidationError::InvalidParameter` if `step` is off the grid.
pub fn moment_check(
    model: &CalibratedModel,
    result: &SimulationResult,
    step: usize,
) -> Result<MomentCheck, ValidationError> {
    let time = grid_time(result, step)?;
    let sample = result
        .sample_moments(step)
        .ok_or_else(|| ValidationError::invalid("step", format!("{step} is off the grid")))?;
    let view = model.model();
    let analytic_mean = view
        .short_rate_mean(time)
        .map_err(|e| ValidationError::invalid("step", e.to_string()))?;

    Ok(MomentCheck {
        time,
        sample_mean: sample.mean,
        sample_variance: sample.variance,
        analytic_mean,
        analytic_variance: view.short_rate_variance(time),
        std_error: sample.std_error,
    })
}

fn grid_time(result: &SimulationResult, step: usize) -> Result<f64, ValidationError> {
    result.time_grid().get(step).copied().ok_or_else(|| {
        ValidationError::invalid(
            "step",
            format!("{step} is off a grid of {} points", result.num_timesteps()),
        )
    })
}
