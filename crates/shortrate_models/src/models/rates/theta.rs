//! Term-structure fitting: the drift θ(t) that makes the model reprice the
//! initial discount curve.
//!
//! ```text
//! θ(t) = ∂f(0,t)/∂t + a·f(0,t) + σ²/(2a)·(1 − e^{−2at})
//! ```
//!
//! The fitter tabulates θ on a uniform grid and rejects curves whose implied
//! forwards are unusable, so that no NaN ever reaches the pricer or the
//! simulator.

use super::hull_white::{HullWhiteModel, HullWhiteParams};
use crate::error::CurveFittingError;
use shortrate_core::market_data::curves::{DiscountCurve, YieldCurve};
use shortrate_core::math::interpolators::{Interpolator, LinearInterpolator};

/// Grid and sanity bounds for [`TermStructureFitter`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FitterConfig {
    /// Minimum tabulated horizon in years; extended to the last curve pillar.
    pub horizon: f64,
    /// Grid spacing in years.
    pub step: f64,
    /// Largest acceptable |f(0,t)|.
    pub max_abs_forward: f64,
}

impl Default for FitterConfig {
    fn default() -> Self {
        Self {
            horizon: 60.0,
            step: 1.0 / 52.0,
            max_abs_forward: 1.0,
        }
    }
}

impl FitterConfig {
    /// Set the minimum horizon.
    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the grid spacing.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Set the forward-rate bound.
    pub fn with_max_abs_forward(mut self, max_abs_forward: f64) -> Self {
        self.max_abs_forward = max_abs_forward;
        self
    }

    /// Check that every field is positive and finite.
    pub fn validate(&self) -> Result<(), CurveFittingError> {
        for (name, value) in [
            ("horizon", self.horizon),
            ("step", self.step),
            ("max_abs_forward", self.max_abs_forward),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CurveFittingError::InvalidConfig(format!(
                    "{name} = {value} must be positive and finite"
                )));
            }
        }
        Ok(())
    }
}

/// θ(t) sampled on a uniform grid starting at 0.
///
/// Linear between grid points, flat beyond either end.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThetaTable {
    table: LinearInterpolator<f64>,
}

impl ThetaTable {
    /// θ at time `t`.
    #[inline]
    pub fn value(&self, t: f64) -> f64 {
        self.table.interpolate_flat(t)
    }

    /// Grid times.
    #[inline]
    pub fn times(&self) -> &[f64] {
        self.table.xs()
    }

    /// θ at the grid times.
    #[inline]
    pub fn values(&self) -> &[f64] {
        self.table.ys()
    }

    /// Last grid time.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.table.domain().1
    }
}

/// Builds [`ThetaTable`]s from an initial curve.
///
/// # Example
///
/// ```
/// use shortrate_core::market_data::curves::DiscountCurve;
/// use shortrate_models::models::rates::{HullWhiteParams, TermStructureFitter};
///
/// let curve = DiscountCurve::flat(0.02, &[1.0, 5.0, 10.0]).unwrap();
/// let params = HullWhiteParams::new(0.1, 0.01).unwrap();
/// let theta = TermStructureFitter::default().fit(&params, &curve).unwrap();
///
/// // θ(0) = a·r for a flat curve
/// assert!((theta.value(0.0) - 0.1 * 0.02).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TermStructureFitter {
    config: FitterConfig,
}

impl TermStructureFitter {
    /// Create a fitter.
    pub fn new(config: FitterConfig) -> Self {
        Self { config }
    }

    /// Fitter configuration.
    pub fn config(&self) -> &FitterConfig {
        &self.config
    }

    /// Tabulate θ for `params` against `curve`.
    ///
    /// # Errors
    ///
    /// * `CurveFittingError::ForwardOutOfRange` - a forward is non-finite or
    ///   exceeds `max_abs_forward` in absolute value
    /// * `CurveFittingError::NonFiniteTheta` - θ is NaN or infinite
    /// * `CurveFittingError::InvalidConfig` - bad grid settings
    pub fn fit(
        &self,
        params: &HullWhiteParams,
        curve: &DiscountCurve,
    ) -> Result<ThetaTable, CurveFittingError> {
        self.config.validate()?;
        let model = HullWhiteModel::new(*params, curve);

        let horizon = self.config.horizon.max(curve.last_maturity());
        let step = self.config.step;
        let intervals = ((horizon / step) - 1e-9).ceil().max(1.0) as usize;
        let limit = self.config.max_abs_forward;

        let mut times = Vec::with_capacity(intervals + 1);
        let mut values = Vec::with_capacity(intervals + 1);
        for i in 0..=intervals {
            let t = i as f64 * step;
            let forward = curve.instantaneous_forward(t)?;
            if !(forward.is_finite() && forward.abs() <= limit) {
                return Err(CurveFittingError::ForwardOutOfRange { t, forward, limit });
            }
            let value = model.theta(t)?;
            if !value.is_finite() {
                return Err(CurveFittingError::NonFiniteTheta { t, value });
            }
            times.push(t);
            values.push(value);
        }

        let table = LinearInterpolator::new(&times, &values)
            .map_err(|e| CurveFittingError::InvalidConfig(e.to_string()))?;
        Ok(ThetaTable { table })
    }
}
