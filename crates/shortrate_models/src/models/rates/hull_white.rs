//! Hull-White one-factor interest rate model.
//!
//! The short rate follows
//! ```text
//! dr(t) = [θ(t) − a·r(t)]·dt + σ·dW(t)
//! ```
//! where:
//! - a = mean reversion speed (positive)
//! - σ = volatility (positive)
//! - θ(t) = time-dependent drift fitted to the initial discount curve
//!
//! Zero-coupon bonds are exponential-affine in the short rate:
//! ```text
//! P(t,T) = A(t,T)·exp(−B(t,T)·r(t))
//! B(t,T) = (1 − e^{−a(T−t)}) / a
//! ln A(t,T) = ln(P(0,T)/P(0,t)) + B(t,T)·f(0,t) − σ²/(4a)·(1 − e^{−2at})·B(t,T)²
//! ```
//!
//! ## Usage
//!
//! ```
//! use shortrate_core::market_data::curves::{DiscountCurve, YieldCurve};
//! use shortrate_models::models::rates::{HullWhiteModel, HullWhiteParams};
//!
//! let curve = DiscountCurve::flat(0.03, &[1.0, 5.0, 10.0]).unwrap();
//! let model = HullWhiteModel::new(HullWhiteParams::new(0.05, 0.01).unwrap(), &curve);
//!
//! // Today's bond price at today's short rate reproduces the curve
//! let r0 = model.initial_short_rate();
//! let p = model.bond_price(0.0, 5.0, r0).unwrap();
//! assert!((p - curve.discount_factor(5.0).unwrap()).abs() < 1e-12);
//! ```

use shortrate_core::market_data::curves::{DiscountCurve, YieldCurve};
use shortrate_core::market_data::MarketDataError;
use shortrate_core::types::ValidationError;

/// Hull-White parameters `(a, σ)`.
///
/// Both are strictly positive and finite; construction enforces this and
/// deserialisation re-checks it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawParams")
)]
pub struct HullWhiteParams {
    mean_reversion: f64,
    volatility: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawParams {
    mean_reversion: f64,
    volatility: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawParams> for HullWhiteParams {
    type Error = ValidationError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        Self::new(raw.mean_reversion, raw.volatility)
    }
}

impl HullWhiteParams {
    /// Create parameters.
    ///
    /// # Errors
    ///
    /// `ValidationError::InvalidParameter` if either value is not positive and finite.
    ///
    /// # Example
    ///
    /// ```
    /// use shortrate_models::models::rates::HullWhiteParams;
    ///
    /// assert!(HullWhiteParams::new(0.05, 0.01).is_ok());
    /// assert!(HullWhiteParams::new(-0.05, 0.01).is_err());
    /// assert!(HullWhiteParams::new(0.05, 0.0).is_err());
    /// ```
    pub fn new(mean_reversion: f64, volatility: f64) -> Result<Self, ValidationError> {
        if !(mean_reversion.is_finite() && mean_reversion > 0.0) {
            return Err(ValidationError::invalid(
                "mean_reversion",
                format!("{mean_reversion} is not positive and finite"),
            ));
        }
        if !(volatility.is_finite() && volatility > 0.0) {
            return Err(ValidationError::invalid(
                "volatility",
                format!("{volatility} is not positive and finite"),
            ));
        }
        Ok(Self {
            mean_reversion,
            volatility,
        })
    }

    /// Mean reversion speed `a`.
    #[inline]
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Short-rate volatility `σ`.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

/// `B(τ) = (1 − e^{−aτ}) / a`, tending to `τ` as `a → 0`.
///
/// # Example
///
/// ```
/// use shortrate_models::models::rates::b_function;
///
/// assert!((b_function(0.1, 5.0) - (1.0 - (-0.5_f64).exp()) / 0.1).abs() < 1e-14);
/// assert_eq!(b_function(0.0, 5.0), 5.0);
/// ```
#[inline]
pub fn b_function(a: f64, tau: f64) -> f64 {
    if a.abs() < 1e-14 {
        tau
    } else {
        -(-a * tau).exp_m1() / a
    }
}

/// Hull-White model over a borrowed initial curve.
///
/// Everything here is closed form in the curve and `(a, σ)`; the fitted θ
/// table is only needed for simulation.
#[derive(Clone, Copy, Debug)]
pub struct HullWhiteModel<'a> {
    params: HullWhiteParams,
    curve: &'a DiscountCurve,
}

impl<'a> HullWhiteModel<'a> {
    /// View `curve` under parameters `params`.
    pub fn new(params: HullWhiteParams, curve: &'a DiscountCurve) -> Self {
        Self { params, curve }
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HullWhiteParams {
        &self.params
    }

    /// Initial discount curve.
    #[inline]
    pub fn curve(&self) -> &'a DiscountCurve {
        self.curve
    }

    /// r(0) = f(0, 0).
    #[inline]
    pub fn initial_short_rate(&self) -> f64 {
        self.curve.initial_short_rate()
    }

    /// B(t, T).
    #[inline]
    pub fn b(&self, t: f64, maturity: f64) -> f64 {
        b_function(self.params.mean_reversion, maturity - t)
    }

    /// ln A(t, T).
    pub fn log_a(&self, t: f64, maturity: f64) -> Result<f64, MarketDataError> {
        let a = self.params.mean_reversion;
        let sigma = self.params.volatility;
        let p_t = self.curve.discount_factor(t)?;
        let p_maturity = self.curve.discount_factor(maturity)?;
        let f_t = self.curve.instantaneous_forward(t)?;
        let b = self.b(t, maturity);
        // σ²/(4a)·(1 − e^{−2at}) = σ²/2 · B_{2a}(t)
        let convexity = 0.5 * sigma * sigma * b_function(2.0 * a, t);
        Ok((p_maturity / p_t).ln() + b * f_t - convexity * b * b)
    }

    /// P(t, T) given r(t), without input validation.
    pub fn bond_price(&self, t: f64, maturity: f64, short_rate: f64) -> Result<f64, MarketDataError> {
        if t == maturity {
            return Ok(1.0);
        }
        Ok((self.log_a(t, maturity)? - self.b(t, maturity) * short_rate).exp())
    }

    /// Standard deviation of `ln(P(T₀,S)/P(T₀,U))` seen from today.
    ///
    /// `σ·√((1 − e^{−2aT₀})/(2a))·(B(T₀,S) − B(T₀,U))`. With `U = T₀` this is
    /// the usual zero-coupon bond option volatility.
    pub fn bond_ratio_volatility(&self, expiry: f64, maturity: f64, numeraire: f64) -> f64 {
        let a = self.params.mean_reversion;
        let sigma = self.params.volatility;
        let spread = self.b(expiry, maturity) - self.b(expiry, numeraire);
        sigma * b_function(2.0 * a, expiry).sqrt() * spread.abs()
    }

    /// θ(t) = ∂f(0,t)/∂t + a·f(0,t) + σ²/(2a)·(1 − e^{−2at}).
    pub fn theta(&self, t: f64) -> Result<f64, MarketDataError> {
        let a = self.params.mean_reversion;
        let sigma = self.params.volatility;
        let f = self.curve.instantaneous_forward(t)?;
        let slope = self.curve.forward_slope(t)?;
        Ok(slope + a * f + sigma * sigma * b_function(2.0 * a, t))
    }

    /// E[r(t)] = f(0,t) + σ²/(2a²)·(1 − e^{−at})².
    pub fn short_rate_mean(&self, t: f64) -> Result<f64, MarketDataError> {
        let sigma = self.params.volatility;
        let b = b_function(self.params.mean_reversion, t);
        Ok(self.curve.instantaneous_forward(t)? + 0.5 * sigma * sigma * b * b)
    }

    /// Var[r(t)] = σ²/(2a)·(1 − e^{−2at}).
    pub fn short_rate_variance(&self, t: f64) -> f64 {
        let sigma = self.params.volatility;
        sigma * sigma * b_function(2.0 * self.params.mean_reversion, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    fn upward_curve() -> DiscountCurve {
        DiscountCurve::from_maturities_and_prices(
            &[0.5, 1.0, 2.0, 5.0, 10.0, 20.0],
            &[0.990, 0.979, 0.955, 0.880, 0.760, 0.550],
        )
        .unwrap()
    }

    #[test]
    fn test_b_function_small_a_limit() {
        assert_relative_eq!(b_function(1e-10, 3.0), 3.0, max_relative = 1e-9);
        assert_eq!(b_function(0.0, 2.0), 2.0);
        assert_eq!(b_function(0.3, 0.0), 0.0);
    }

    #[test]
    fn test_bond_at_maturity_is_one() {
        let curve = upward_curve();
        let model = HullWhiteModel::new(HullWhiteParams::new(0.1, 0.02).unwrap(), &curve);
        for t in [0.0, 1.3, 7.0, 25.0] {
            assert_eq!(model.bond_price(t, t, 0.05).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_reproduces_initial_curve() {
        let curve = upward_curve();
        let model = HullWhiteModel::new(HullWhiteParams::new(0.08, 0.015).unwrap(), &curve);
        let r0 = model.initial_short_rate();
        for maturity in [0.25, 1.0, 3.5, 10.0, 30.0] {
            assert_relative_eq!(
                model.bond_price(0.0, maturity, r0).unwrap(),
                curve.discount_factor(maturity).unwrap(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_bond_price_decreasing_in_rate() {
        let curve = upward_curve();
        let model = HullWhiteModel::new(HullWhiteParams::new(0.1, 0.01).unwrap(), &curve);
        let low = model.bond_price(1.0, 6.0, 0.01).unwrap();
        let high = model.bond_price(1.0, 6.0, 0.05).unwrap();
        assert!(low > high);
    }

    #[test]
    fn test_flat_curve_moments() {
        let curve = DiscountCurve::flat(0.03, &[1.0, 10.0]).unwrap();
        let (a, sigma) = (0.2, 0.01);
        let model = HullWhiteModel::new(HullWhiteParams::new(a, sigma).unwrap(), &curve);
        let t = 4.0;
        let b = (1.0 - f64::exp(-a * t)) / a;
        assert_relative_eq!(
            model.short_rate_mean(t).unwrap(),
            0.03 + 0.5 * sigma * sigma * b * b,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            model.short_rate_variance(t),
            sigma * sigma / (2.0 * a) * (1.0 - f64::exp(-2.0 * a * t)),
            max_relative = 1e-12
        );
        assert_abs_diff_eq!(
            model.theta(t).unwrap(),
            a * 0.03 + sigma * sigma / (2.0 * a) * (1.0 - f64::exp(-2.0 * a * t)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bond_ratio_volatility() {
        let curve = upward_curve();
        let (a, sigma) = (0.1, 0.01);
        let model = HullWhiteModel::new(HullWhiteParams::new(a, sigma).unwrap(), &curve);
        let expected = sigma * ((1.0 - f64::exp(-2.0 * a)) / (2.0 * a)).sqrt()
            * (1.0 - f64::exp(-a * 4.0))
            / a;
        assert_relative_eq!(model.bond_ratio_volatility(1.0, 5.0, 1.0), expected, max_relative = 1e-12);
        assert_eq!(model.bond_ratio_volatility(0.0, 5.0, 0.0), 0.0);
    }

    #[test]
    fn test_params_validation() {
        assert!(HullWhiteParams::new(f64::NAN, 0.01).is_err());
        assert!(HullWhiteParams::new(0.1, f64::INFINITY).is_err());
        let p = HullWhiteParams::new(0.1, 0.01).unwrap();
        assert_eq!(p.mean_reversion(), 0.1);
        assert_eq!(p.volatility(), 0.01);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_params_deserialisation_validates() {
        let p: HullWhiteParams =
            serde_json::from_str(r#"{"mean_reversion":0.1,"volatility":0.01}"#).unwrap();
        assert_eq!(p, HullWhiteParams::new(0.1, 0.01).unwrap());
        assert!(serde_json::from_str::<HullWhiteParams>(
            r#"{"mean_reversion":-0.1,"volatility":0.01}"#
        )
        .is_err());
    }

    proptest! {
        #[test]
        fn b_function_is_bounded(a in 1e-4f64..5.0, tau in 0.0f64..60.0) {
            let b = b_function(a, tau);
            prop_assert!(b >= 0.0);
            prop_assert!(b <= tau + 1e-12);
            prop_assert!(b <= 1.0 / a + 1e-12);
        }
    }
}
