//! Basket pricing objective in log-parameter space.

use super::CalibrationConfig;
use shortrate_core::market_data::curves::DiscountCurve;
use shortrate_core::math::solvers::BoxConstraints;
use shortrate_core::types::ValidationError;
use shortrate_models::instruments::rates::{price_swaption_with, MarketSwaption};
use shortrate_models::models::rates::{HullWhiteModel, HullWhiteParams, TermStructureFitter};
use shortrate_models::{CurveFittingError, PricingError};
use std::cell::{Cell, RefCell};

/// Maps search coordinates to `(a, σ)` and prices the basket.
///
/// Coordinates are `[ln a, ln σ]`, or `[ln σ]` when `a` is fixed. A curve
/// fitting failure is remembered and every later evaluation short-circuits,
/// so the caller can surface it once the solver returns.
///
/// Each trial runs the fitter only to detect a `CurveFittingError` for its
/// `(a, σ)`; the table is discarded because swaption prices use the closed
/// form on the curve. The table the model keeps is fitted once, after the
/// search.
pub(crate) struct BasketObjective<'a> {
    curve: &'a DiscountCurve,
    swaptions: &'a [MarketSwaption],
    config: &'a CalibrationConfig,
    fitter: TermStructureFitter,
    fatal: RefCell<Option<CurveFittingError>>,
    failures: Cell<usize>,
}

impl<'a> BasketObjective<'a> {
    pub(crate) fn new(
        curve: &'a DiscountCurve,
        swaptions: &'a [MarketSwaption],
        config: &'a CalibrationConfig,
    ) -> Self {
        Self {
            curve,
            swaptions,
            config,
            fitter: TermStructureFitter::new(config.fitter),
            fatal: RefCell::new(None),
            failures: Cell::new(0),
        }
    }

    /// Number of search coordinates.
    pub(crate) fn dimension(&self) -> usize {
        if self.config.fixed_mean_reversion.is_some() {
            1
        } else {
            2
        }
    }

    /// Log-space box for the search coordinates.
    pub(crate) fn bounds(&self) -> Result<BoxConstraints, ValidationError> {
        let (a_lo, a_hi) = self.config.mean_reversion_bounds;
        let (s_lo, s_hi) = self.config.volatility_bounds;
        let (lower, upper) = if self.config.fixed_mean_reversion.is_some() {
            (vec![s_lo.ln()], vec![s_hi.ln()])
        } else {
            (vec![a_lo.ln(), s_lo.ln()], vec![a_hi.ln(), s_hi.ln()])
        };
        BoxConstraints::new(lower, upper)
            .map_err(|e| ValidationError::invalid("bounds", e.to_string()))
    }

    /// Search coordinates for a start point.
    pub(crate) fn encode(&self, mean_reversion: f64, volatility: f64) -> Vec<f64> {
        if self.config.fixed_mean_reversion.is_some() {
            vec![volatility.ln()]
        } else {
            vec![mean_reversion.ln(), volatility.ln()]
        }
    }

    /// Parameters for search coordinates.
    pub(crate) fn decode(&self, x: &[f64]) -> Result<HullWhiteParams, ValidationError> {
        let volatility = x.last().copied().unwrap_or(f64::NAN).exp();
        let mean_reversion = match self.config.fixed_mean_reversion {
            Some(a) => a,
            None => x.first().copied().unwrap_or(f64::NAN).exp(),
        };
        HullWhiteParams::new(mean_reversion, volatility)
    }

    /// Fit θ for `params`; any error aborts the calibration.
    pub(crate) fn check_curve(&self, params: &HullWhiteParams) -> Result<(), CurveFittingError> {
        self.fitter.fit(params, self.curve).map(|_| ())
    }

    /// Model price of every instrument, in basket order.
    pub(crate) fn model_prices(&self, params: HullWhiteParams) -> Vec<Result<f64, PricingError>> {
        let model = HullWhiteModel::new(params, self.curve);
        let jamshidian = self.config.jamshidian;

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            use rayon::prelude::*;

            return self
                .swaptions
                .par_iter()
                .map(|swaption| price_swaption_with(&model, swaption, &jamshidian))
                .collect();
        }

        self.swaptions
            .iter()
            .map(|swaption| price_swaption_with(&model, swaption, &jamshidian))
            .collect()
    }

    /// Model minus market price per instrument; a failed price contributes
    /// `√penalty`.
    pub(crate) fn residuals(&self, x: &[f64]) -> Vec<f64> {
        let unusable = vec![f64::INFINITY; self.swaptions.len()];
        if self.fatal.borrow().is_some() {
            return unusable;
        }
        let Ok(params) = self.decode(x) else {
            return unusable;
        };
        if let Err(err) = self.check_curve(&params) {
            *self.fatal.borrow_mut() = Some(err);
            return unusable;
        }

        let penalty = self.config.pricing_failure_penalty.sqrt();
        self.model_prices(params)
            .into_iter()
            .zip(self.swaptions)
            .map(|(price, swaption)| match price {
                Ok(p) => p - swaption.market_price(),
                Err(_) => {
                    self.failures.set(self.failures.get() + 1);
                    penalty
                }
            })
            .collect()
    }

    /// Sum of squared residuals.
    pub(crate) fn sum_squared_error(&self, x: &[f64]) -> f64 {
        self.residuals(x).iter().map(|r| r * r).sum()
    }

    /// Take the curve fitting failure recorded during evaluation, if any.
    pub(crate) fn take_fatal(&self) -> Option<CurveFittingError> {
        self.fatal.borrow_mut().take()
    }

    /// Penalised pricings so far.
    pub(crate) fn failures(&self) -> usize {
        self.failures.get()
    }
}
