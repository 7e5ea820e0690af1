//! Hull-White calibration to a swaption basket.
//!
//! For trial parameters the drift table is refitted to the curve, every
//! swaption is priced by Jamshidian's decomposition, and the squared
//! differences to the market prices are summed. The simplex search runs
//! from each configured start point in turn; the best result is polished
//! with Levenberg-Marquardt on the residual vector.

use super::objective::BasketObjective;
use super::{CalibrationConfig, CalibrationReport, InstrumentFit};
use crate::error::CalibrationError;
use shortrate_core::market_data::curves::{DiscountCurve, YieldCurvePoint};
use shortrate_core::math::solvers::{LevenbergMarquardtSolver, NelderMeadSolver};
use shortrate_core::types::ValidationError;
use shortrate_models::instruments::rates::MarketSwaption;
use shortrate_models::models::rates::{CalibratedModel, HullWhiteParams};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Calibrate with [`CalibrationConfig::default`].
///
/// # Errors
///
/// As [`HullWhiteCalibrator::calibrate`].
pub fn calibrate(
    curve: &[YieldCurvePoint],
    swaptions: &[MarketSwaption],
) -> Result<CalibratedModel, CalibrationError> {
    HullWhiteCalibrator::default().calibrate(curve, swaptions)
}

/// Hull-White calibrator.
///
/// # Example
///
/// ```
/// use shortrate_core::market_data::curves::{DiscountCurve, YieldCurvePoint};
/// use shortrate_models::instruments::rates::{price_swaption, MarketSwaption};
/// use shortrate_models::models::rates::{HullWhiteModel, HullWhiteParams};
/// use shortrate_optimiser::{CalibrationConfig, HullWhiteCalibrator};
///
/// let points: Vec<YieldCurvePoint> = [(1.0, 0.97), (3.0, 0.91), (5.0, 0.86), (10.0, 0.74)]
///     .iter()
///     .map(|&(t, p)| YieldCurvePoint::new(t, p))
///     .collect();
///
/// // Quote generated at sigma = 1.2%
/// let curve = DiscountCurve::new(&points).unwrap();
/// let truth = HullWhiteModel::new(HullWhiteParams::new(0.05, 0.012).unwrap(), &curve);
/// let template = MarketSwaption::new(0.03, 2.0, 2.0, 7.0, 1.0, 0.0).unwrap();
/// let quote = template.with_market_price(price_swaption(&truth, &template).unwrap()).unwrap();
///
/// let config = CalibrationConfig::default().with_fixed_mean_reversion(0.05);
/// let (model, report) = HullWhiteCalibrator::new(config)
///     .calibrate_with_report(&points, &[quote])
///     .unwrap();
/// assert!((model.volatility() - 0.012).abs() < 1e-6);
/// assert_eq!(report.instruments.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HullWhiteCalibrator {
    config: CalibrationConfig,
}

impl HullWhiteCalibrator {
    /// Create a calibrator.
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Calibrator settings.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Fit `(a, σ)` to the basket.
    ///
    /// # Errors
    ///
    /// * `CalibrationError::InvalidConfig` - unusable settings
    /// * `CalibrationError::Validation` - bad curve or empty basket, raised
    ///   before any optimiser iteration
    /// * `CalibrationError::CurveFitting` - the curve cannot support θ(t)
    /// * `CalibrationError::NotConverged` - no run converged within budget
    /// * `CalibrationError::Pricing` - the final parameters fail to price
    pub fn calibrate(
        &self,
        curve: &[YieldCurvePoint],
        swaptions: &[MarketSwaption],
    ) -> Result<CalibratedModel, CalibrationError> {
        self.calibrate_with_report(curve, swaptions)
            .map(|(model, _)| model)
    }

    /// Fit `(a, σ)` and return per-instrument diagnostics alongside.
    ///
    /// # Errors
    ///
    /// As [`calibrate`](Self::calibrate).
    pub fn calibrate_with_report(
        &self,
        curve: &[YieldCurvePoint],
        swaptions: &[MarketSwaption],
    ) -> Result<(CalibratedModel, CalibrationReport), CalibrationError> {
        let started = Instant::now();
        let config = &self.config;
        config.validate()?;

        let curve = DiscountCurve::new(curve)?;
        if swaptions.is_empty() {
            return Err(ValidationError::EmptyBasket.into());
        }

        let objective = BasketObjective::new(&curve, swaptions, config);
        let bounds = objective.bounds()?;
        let starts = self.start_points();
        let deadline = config.time_limit().map(|limit| started + limit);

        // A curve the fitter rejects is rejected for every trial point
        let (a0, s0) = starts[0];
        objective.check_curve(&objective.decode(&objective.encode(a0, s0))?)?;

        info!(
            "Calibrating Hull-White to {} swaptions from {} start points",
            swaptions.len(),
            starts.len()
        );

        let simplex = NelderMeadSolver::new(config.nelder_mead);
        let mut best: Option<(Vec<f64>, f64, bool)> = None;
        let mut iterations = 0;
        let mut starts_run = 0;

        for (i, &(a, sigma)) in starts.iter().enumerate() {
            if i > 0 && deadline.is_some_and(|d| Instant::now() >= d) {
                debug!("Time limit reached after {} starts", starts_run);
                break;
            }
            let failures_before = objective.failures();
            let result = simplex.minimise(
                |x| objective.sum_squared_error(x),
                &objective.encode(a, sigma),
                &bounds,
                deadline,
            )?;
            if let Some(err) = objective.take_fatal() {
                return Err(err.into());
            }
            starts_run += 1;
            iterations += result.iterations;

            debug!(
                "Start {} (a = {}, sigma = {}): error = {:e} after {} iterations ({:?})",
                i, a, sigma, result.value, result.iterations, result.reason
            );
            let penalised = objective.failures() - failures_before;
            if penalised > 0 {
                warn!(
                    "Start {}: {} swaption prices failed and were penalised",
                    i, penalised
                );
            }

            let better = best.as_ref().map_or(true, |(_, value, _)| result.value < *value);
            if better {
                best = Some((result.x.clone(), result.value, result.converged()));
            }
        }

        let Some((mut x, mut error, mut converged)) = best else {
            return Err(CalibrationError::InvalidConfig(
                "no start point was run".to_string(),
            ));
        };

        let mut polished = false;
        if config.polish {
            let solver = LevenbergMarquardtSolver::new(config.levenberg_marquardt);
            match solver.solve(|p| objective.residuals(p), x.clone(), Some(&bounds)) {
                Ok(result) => {
                    if let Some(err) = objective.take_fatal() {
                        return Err(err.into());
                    }
                    iterations += result.iterations;
                    debug!(
                        "Polish: error {:e} -> {:e} after {} iterations",
                        error, result.residual_ss, result.iterations
                    );
                    if result.residual_ss <= error {
                        polished = result.residual_ss < error;
                        x = result.params;
                        error = result.residual_ss;
                        converged = converged || result.converged;
                    }
                }
                Err(err) => warn!("Polish skipped: {}", err),
            }
        }

        let params = objective.decode(&x)?;
        if !converged {
            warn!(
                "Calibration did not converge: a = {}, sigma = {}, error = {:e}",
                params.mean_reversion(),
                params.volatility(),
                error
            );
            return Err(CalibrationError::NotConverged {
                mean_reversion: params.mean_reversion(),
                volatility: params.volatility(),
                error,
                iterations,
            });
        }

        let (model, report) = self.finish(params, &curve, swaptions, &objective)?;
        let report = report
            .with_iterations(iterations)
            .with_starts(starts_run)
            .with_polished(polished)
            .with_duration(started.elapsed());

        info!(
            "Calibrated a = {:.6}, sigma = {:.6}: RMSE {:e} in {:?}",
            model.mean_reversion(),
            model.volatility(),
            report.rmse,
            report.duration
        );
        Ok((model, report))
    }

    /// Start points in search order, deduplicated on `σ` when `a` is fixed.
    fn start_points(&self) -> Vec<(f64, f64)> {
        match self.config.fixed_mean_reversion {
            Some(a) => {
                let mut points: Vec<(f64, f64)> = Vec::new();
                for &(_, sigma) in &self.config.start_points {
                    if !points.iter().any(|&(_, s)| s == sigma) {
                        points.push((a, sigma));
                    }
                }
                points
            }
            None => self.config.start_points.clone(),
        }
    }

    /// Re-fit θ and re-price the basket without penalties.
    fn finish(
        &self,
        params: HullWhiteParams,
        curve: &DiscountCurve,
        swaptions: &[MarketSwaption],
        objective: &BasketObjective<'_>,
    ) -> Result<(CalibratedModel, CalibrationReport), CalibrationError> {
        let instruments = objective
            .model_prices(params)
            .into_iter()
            .zip(swaptions)
            .map(|(price, swaption)| {
                price.map(|model_price| InstrumentFit {
                    market_price: swaption.market_price(),
                    model_price,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let report = CalibrationReport::new(instruments);
        let model =
            CalibratedModel::fit(params, curve.clone(), &self.config.fitter, report.sum_squared_error)?;
        Ok((model, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<YieldCurvePoint> {
        [(1.0, 0.97), (2.0, 0.94), (5.0, 0.86), (10.0, 0.74)]
            .iter()
            .map(|&(t, p)| YieldCurvePoint::new(t, p))
            .collect()
    }

    #[test]
    fn test_fixed_mean_reversion_dedupes_starts() {
        let calibrator =
            HullWhiteCalibrator::new(CalibrationConfig::default().with_fixed_mean_reversion(0.2));
        let starts = calibrator.start_points();
        assert_eq!(starts, vec![(0.2, 0.005), (0.2, 0.01), (0.2, 0.02)]);
    }

    #[test]
    fn test_empty_basket() {
        let err = calibrate(&points(), &[]).unwrap_err();
        assert_eq!(err, CalibrationError::Validation(ValidationError::EmptyBasket));
    }

    #[test]
    fn test_invalid_config_checked_first() {
        let calibrator =
            HullWhiteCalibrator::new(CalibrationConfig::default().with_start_points(Vec::new()));
        let err = calibrator.calibrate(&[], &[]).unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidConfig(_)));
    }

    #[test]
    fn test_unpriceable_basket_fails_on_final_reprice() {
        let mut config = CalibrationConfig::default()
            .with_parallel(false)
            .with_start_points(vec![(0.1, 0.01)]);
        config.jamshidian.lower = 0.9;
        config.jamshidian.upper = 1.0;
        config.jamshidian.max_half_width = 0.05;

        let swaption = MarketSwaption::new(0.03, 1.0, 1.0, 5.0, 1.0, 0.01).unwrap();
        let err = HullWhiteCalibrator::new(config)
            .calibrate(&points(), &[swaption])
            .unwrap_err();
        assert!(matches!(err, CalibrationError::Pricing(_)), "{err:?}");
    }
}
