//! Immutable output of a calibration.

use super::hull_white::{HullWhiteModel, HullWhiteParams};
use super::theta::{FitterConfig, TermStructureFitter, ThetaTable};
use crate::error::CurveFittingError;
use shortrate_core::market_data::curves::DiscountCurve;

/// Hull-White parameters together with the curve they were fitted to, the
/// drift table and the calibration objective reached.
///
/// Cheap to share between threads; nothing mutates it after construction.
///
/// θ is always derived from the parameters and the curve. The serialised form
/// therefore stores only the fitting inputs, and deserialising re-runs the
/// fit so a stored model cannot carry a drift table of its own.
///
/// # Example
///
/// ```
/// use shortrate_core::market_data::curves::DiscountCurve;
/// use shortrate_models::models::rates::{CalibratedModel, FitterConfig, HullWhiteParams};
///
/// let curve = DiscountCurve::flat(0.03, &[1.0, 10.0]).unwrap();
/// let params = HullWhiteParams::new(0.1, 0.01).unwrap();
/// let model = CalibratedModel::fit(params, curve, &FitterConfig::default(), 0.0).unwrap();
///
/// assert_eq!(model.mean_reversion(), 0.1);
/// assert!((model.initial_short_rate() - 0.03).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "StoredModel", into = "StoredModel")
)]
pub struct CalibratedModel {
    params: HullWhiteParams,
    theta: ThetaTable,
    curve: DiscountCurve,
    fitter: FitterConfig,
    calibration_error: f64,
}

/// On-disk layout of [`CalibratedModel`]. An unfinished calibration error
/// (`+∞`) is written as `null`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredModel {
    params: HullWhiteParams,
    curve: DiscountCurve,
    #[serde(default)]
    fitter: FitterConfig,
    calibration_error: Option<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<StoredModel> for CalibratedModel {
    type Error = CurveFittingError;

    fn try_from(stored: StoredModel) -> Result<Self, Self::Error> {
        Self::fit(
            stored.params,
            stored.curve,
            &stored.fitter,
            stored.calibration_error.unwrap_or(f64::INFINITY),
        )
    }
}

#[cfg(feature = "serde")]
impl From<CalibratedModel> for StoredModel {
    fn from(model: CalibratedModel) -> Self {
        Self {
            params: model.params,
            curve: model.curve,
            fitter: model.fitter,
            calibration_error: Some(model.calibration_error).filter(|e| e.is_finite()),
        }
    }
}

impl CalibratedModel {
    /// Fit θ for `params` on `curve` and bundle the result.
    ///
    /// A negative or non-finite `calibration_error` is stored as `+∞`.
    ///
    /// # Errors
    ///
    /// Any [`CurveFittingError`] from [`TermStructureFitter::fit`].
    pub fn fit(
        params: HullWhiteParams,
        curve: DiscountCurve,
        config: &FitterConfig,
        calibration_error: f64,
    ) -> Result<Self, CurveFittingError> {
        let theta = TermStructureFitter::new(*config).fit(&params, &curve)?;
        let calibration_error = if calibration_error.is_finite() && calibration_error >= 0.0 {
            calibration_error
        } else {
            f64::INFINITY
        };
        Ok(Self {
            params,
            theta,
            curve,
            fitter: *config,
            calibration_error,
        })
    }

    /// Closed-form view of the model.
    #[inline]
    pub fn model(&self) -> HullWhiteModel<'_> {
        HullWhiteModel::new(self.params, &self.curve)
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HullWhiteParams {
        &self.params
    }

    /// Mean reversion `a`.
    #[inline]
    pub fn mean_reversion(&self) -> f64 {
        self.params.mean_reversion()
    }

    /// Volatility `σ`.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.params.volatility()
    }

    /// Fitted drift table.
    #[inline]
    pub fn theta(&self) -> &ThetaTable {
        &self.theta
    }

    /// Grid settings θ was fitted with.
    #[inline]
    pub fn fitter_config(&self) -> &FitterConfig {
        &self.fitter
    }

    /// Initial discount curve.
    #[inline]
    pub fn curve(&self) -> &DiscountCurve {
        &self.curve
    }

    /// Sum of squared pricing errors achieved by calibration.
    #[inline]
    pub fn calibration_error(&self) -> f64 {
        self.calibration_error
    }

    /// r(0) = f(0, 0).
    #[inline]
    pub fn initial_short_rate(&self) -> f64 {
        self.curve.initial_short_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_error_is_sanitised() {
        let curve = DiscountCurve::flat(0.03, &[1.0, 10.0]).unwrap();
        let params = HullWhiteParams::new(0.1, 0.01).unwrap();
        let model = CalibratedModel::fit(params, curve, &FitterConfig::default(), -1.0).unwrap();
        assert_eq!(model.calibration_error(), f64::INFINITY);
    }

    #[test]
    fn test_model_view_shares_curve() {
        let curve = DiscountCurve::flat(0.03, &[1.0, 10.0]).unwrap();
        let params = HullWhiteParams::new(0.1, 0.01).unwrap();
        let calibrated =
            CalibratedModel::fit(params, curve.clone(), &FitterConfig::default(), 1e-8).unwrap();
        let view = calibrated.model();
        assert_eq!(view.curve(), &curve);
        assert_eq!(view.params(), calibrated.params());
        assert_eq!(calibrated.theta().value(0.0), view.theta(0.0).unwrap());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let curve = DiscountCurve::from_maturities_and_prices(&[1.0, 5.0], &[0.97, 0.86]).unwrap();
        let params = HullWhiteParams::new(0.07, 0.012).unwrap();
        let calibrated = CalibratedModel::fit(
            params,
            curve,
            &FitterConfig::default().with_step(0.5),
            2.5e-9,
        )
        .unwrap();
        let json = serde_json::to_string(&calibrated).unwrap();
        assert!(!json.contains("theta"));
        let back: CalibratedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, calibrated);
        assert_eq!(back.fitter_config().step, 0.5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialise_rejects_stored_theta() {
        let curve = DiscountCurve::flat(0.03, &[1.0, 10.0]).unwrap();
        let params = HullWhiteParams::new(0.1, 0.01).unwrap();
        let calibrated = CalibratedModel::fit(params, curve, &FitterConfig::default(), 0.0).unwrap();
        let mut value = serde_json::to_value(&calibrated).unwrap();

        for theta in [
            serde_json::json!({ "table": { "xs": [], "ys": [] } }),
            serde_json::json!({ "table": { "xs": [0.0, 60.0], "ys": [5.0, 5.0] } }),
        ] {
            value["theta"] = theta;
            assert!(serde_json::from_value::<CalibratedModel>(value.clone()).is_err());
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialise_refits_theta() {
        let json = r#"{
            "params": { "mean_reversion": 0.1, "volatility": 0.01 },
            "curve": [ { "maturity": 1.0, "price": 0.97 },
                       { "maturity": 10.0, "price": 0.74 } ],
            "calibration_error": null
        }"#;
        let model: CalibratedModel = serde_json::from_str(json).unwrap();
        let refit = TermStructureFitter::default()
            .fit(model.params(), model.curve())
            .unwrap();
        assert_eq!(model.theta(), &refit);
        assert_eq!(model.fitter_config(), &FitterConfig::default());
        assert_eq!(model.calibration_error(), f64::INFINITY);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialise_rejects_unusable_curve() {
        // 1.0 -> 1.1 implies a forward above 300%
        let json = r#"{
            "params": { "mean_reversion": 0.1, "volatility": 0.01 },
            "curve": [ { "maturity": 1.0, "price": 0.97 },
                       { "maturity": 1.1, "price": 0.70 } ],
            "calibration_error": 0.0
        }"#;
        assert!(serde_json::from_str::<CalibratedModel>(json).is_err());
    }
}
