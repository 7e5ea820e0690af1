//! Closed-form Hull-White pricing.
//!
//! - Zero-coupon bonds `P(t,T) = A(t,T)·exp(−B(t,T)·r)`
//! - European options on zero-coupon bonds
//! - European swaptions by Jamshidian's decomposition
//!
//! # Jamshidian decomposition
//!
//! With fixed payments `c_k = K·δ_k` (plus the unit notional on the last
//! date `t_n`), a payer swaption expiring at `T₀` on a swap starting at
//! `T_α ≥ T₀` pays
//!
//! ```text
//! max(P(T₀,T_α) − Σ c_k·P(T₀,t_k), 0)
//! ```
//!
//! Every ratio `P(T₀,t_k)/P(T₀,T_α)` is decreasing in the short rate, so
//! with `r*` solving `Σ c_k·P(T₀,t_k,r*) = P(T₀,T_α,r*)` and strikes
//! `K_k = P(T₀,t_k,r*)/P(T₀,T_α,r*)` the payoff splits into a portfolio of
//! bond options: payer = Σ c_k·Put(t_k, K_k), receiver = Σ c_k·Call(t_k, K_k).
//!
//! # Example
//!
//! ```
//! use shortrate_core::market_data::curves::DiscountCurve;
//! use shortrate_models::instruments::rates::{forward_swap_value, price_swaption, MarketSwaption, SwaptionType};
//! use shortrate_models::models::rates::{HullWhiteModel, HullWhiteParams};
//!
//! let curve = DiscountCurve::flat(0.03, &[1.0, 5.0, 10.0]).unwrap();
//! let model = HullWhiteModel::new(HullWhiteParams::new(0.1, 0.01).unwrap(), &curve);
//!
//! let payer = MarketSwaption::new(0.03, 2.0, 2.0, 7.0, 1.0, 0.0).unwrap();
//! let receiver = payer.with_kind(SwaptionType::Receiver);
//!
//! let parity = price_swaption(&model, &payer).unwrap() - price_swaption(&model, &receiver).unwrap();
//! assert!((parity - forward_swap_value(&curve, &payer).unwrap()).abs() < 1e-10);
//! ```

use crate::analytical::{bond_exchange_option, OptionType};
use crate::error::PricingError;
use crate::instruments::rates::swaption::{MarketSwaption, SwaptionType};
use crate::models::rates::HullWhiteModel;
use shortrate_core::market_data::curves::YieldCurve;
use shortrate_core::math::solvers::{BrentSolver, SolverConfig};

/// Critical-rate search settings for Jamshidian pricing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JamshidianConfig {
    /// Lower end of the first bracket.
    pub lower: f64,
    /// Upper end of the first bracket.
    pub upper: f64,
    /// Largest half-width the bracket may grow to.
    pub max_half_width: f64,
    /// Brent tolerance and iteration cap.
    pub solver: SolverConfig<f64>,
}

impl Default for JamshidianConfig {
    fn default() -> Self {
        Self {
            lower: -0.5,
            upper: 0.5,
            max_half_width: 5.0,
            solver: SolverConfig::new(1e-14, 100),
        }
    }
}

/// Price at `t` of a zero-coupon bond maturing at `maturity` given the short
/// rate `short_rate` at `t`.
///
/// `t == maturity` returns exactly 1.
///
/// # Errors
///
/// * `PricingError::InvalidInput` - non-finite input, `t < 0` or `maturity < t`
/// * `PricingError::MarketData` - curve lookup failure
///
/// # Example
///
/// ```
/// use shortrate_core::market_data::curves::DiscountCurve;
/// use shortrate_models::instruments::rates::price_zero_coupon_bond;
/// use shortrate_models::models::rates::{HullWhiteModel, HullWhiteParams};
///
/// let curve = DiscountCurve::flat(0.03, &[1.0, 10.0]).unwrap();
/// let model = HullWhiteModel::new(HullWhiteParams::new(0.1, 0.01).unwrap(), &curve);
/// assert_eq!(price_zero_coupon_bond(&model, 2.0, 2.0, 0.05).unwrap(), 1.0);
/// ```
pub fn price_zero_coupon_bond(
    model: &HullWhiteModel<'_>,
    t: f64,
    maturity: f64,
    short_rate: f64,
) -> Result<f64, PricingError> {
    if !(t.is_finite() && maturity.is_finite() && short_rate.is_finite()) {
        return Err(PricingError::InvalidInput(format!(
            "non-finite bond input: t = {t}, T = {maturity}, r = {short_rate}"
        )));
    }
    if t < 0.0 || maturity < t {
        return Err(PricingError::InvalidInput(format!(
            "bond requires 0 <= t <= T, got t = {t}, T = {maturity}"
        )));
    }
    Ok(model.bond_price(t, maturity, short_rate)?)
}

/// Price today of a European option expiring at `expiry` on the zero-coupon
/// bond maturing at `bond_maturity`, struck at `strike`.
///
/// # Errors
///
/// * `PricingError::InvalidInput` - non-finite input, `expiry < 0`,
///   `bond_maturity < expiry` or `strike <= 0`
/// * `PricingError::MarketData` - curve lookup failure
pub fn price_zero_coupon_bond_option(
    model: &HullWhiteModel<'_>,
    expiry: f64,
    bond_maturity: f64,
    strike: f64,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    if !(expiry.is_finite() && bond_maturity.is_finite() && expiry >= 0.0 && bond_maturity >= expiry)
    {
        return Err(PricingError::InvalidInput(format!(
            "bond option requires 0 <= expiry <= maturity, got {expiry} and {bond_maturity}"
        )));
    }
    if !(strike.is_finite() && strike > 0.0) {
        return Err(PricingError::InvalidInput(format!(
            "bond option strike {strike} must be positive"
        )));
    }
    let curve = model.curve();
    let underlying = curve.discount_factor(bond_maturity)?;
    let numeraire = curve.discount_factor(expiry)?;
    let sigma_p = model.bond_ratio_volatility(expiry, bond_maturity, expiry);
    Ok(bond_exchange_option(
        option_type,
        underlying,
        numeraire,
        strike,
        sigma_p,
    ))
}

/// Price a European swaption per unit notional with default settings.
///
/// # Errors
///
/// As [`price_swaption_with`].
pub fn price_swaption(
    model: &HullWhiteModel<'_>,
    swaption: &MarketSwaption,
) -> Result<f64, PricingError> {
    price_swaption_with(model, swaption, &JamshidianConfig::default())
}

/// Price a European swaption per unit notional by Jamshidian's decomposition.
///
/// # Errors
///
/// * `PricingError::RootNotBracketed` - no critical rate within
///   `±config.max_half_width` of the initial bracket midpoint
/// * `PricingError::RootFinding` - Brent failed inside the bracket
/// * `PricingError::MarketData` - curve lookup failure
/// * `PricingError::InvalidInput` - the result is not finite
pub fn price_swaption_with(
    model: &HullWhiteModel<'_>,
    swaption: &MarketSwaption,
    config: &JamshidianConfig,
) -> Result<f64, PricingError> {
    let expiry = swaption.expiry();
    let start = swaption.tenor_start();
    let coupons = coupon_flows(swaption);

    // ln A and B of each payment bond relative to the swap-start bond at expiry
    let log_a_start = model.log_a(expiry, start)?;
    let b_start = model.b(expiry, start);
    let mut legs = Vec::with_capacity(coupons.len());
    for &(date, coupon) in &coupons {
        let log_a = model.log_a(expiry, date)? - log_a_start;
        let b = model.b(expiry, date) - b_start;
        legs.push((date, coupon, log_a, b));
    }

    let excess = |r: f64| -> f64 {
        legs.iter()
            .map(|&(_, c, log_a, b)| c * (log_a - b * r).exp())
            .sum::<f64>()
            - 1.0
    };
    let solver = BrentSolver::new(config.solver);
    let r_star = solver.find_root_expanding(excess, config.lower, config.upper, config.max_half_width)?;

    let curve = model.curve();
    let numeraire = curve.discount_factor(start)?;
    let option_type = match swaption.kind() {
        SwaptionType::Payer => OptionType::Put,
        SwaptionType::Receiver => OptionType::Call,
    };

    let mut price = 0.0;
    for &(date, coupon, log_a, b) in &legs {
        let strike = (log_a - b * r_star).exp();
        let underlying = curve.discount_factor(date)?;
        let sigma_p = model.bond_ratio_volatility(expiry, date, start);
        price += coupon * bond_exchange_option(option_type, underlying, numeraire, strike, sigma_p);
    }

    if !price.is_finite() {
        return Err(PricingError::InvalidInput(format!(
            "non-finite swaption price for critical rate {r_star}"
        )));
    }
    Ok(price)
}

/// Present value today of the underlying payer swap,
/// `P(0,T_α) − Σ c_k·P(0,t_k)`.
///
/// Equals payer minus receiver swaption value.
///
/// # Errors
///
/// `PricingError::MarketData` on curve lookup failure.
pub fn forward_swap_value<C: YieldCurve<f64>>(
    curve: &C,
    swaption: &MarketSwaption,
) -> Result<f64, PricingError> {
    let mut fixed_leg = 0.0;
    for (date, coupon) in coupon_flows(swaption) {
        fixed_leg += coupon * curve.discount_factor(date)?;
    }
    Ok(curve.discount_factor(swaption.tenor_start())? - fixed_leg)
}

/// Fixed-leg annuity `Σ δ_k·P(0,t_k)`.
///
/// # Errors
///
/// `PricingError::MarketData` on curve lookup failure.
pub fn swap_annuity<C: YieldCurve<f64>>(
    curve: &C,
    swaption: &MarketSwaption,
) -> Result<f64, PricingError> {
    let mut annuity = 0.0;
    for (date, accrual) in swaption.fixed_schedule() {
        annuity += accrual * curve.discount_factor(date)?;
    }
    Ok(annuity)
}

/// Fixed rate at which the underlying swap is worth zero today.
///
/// # Errors
///
/// `PricingError::MarketData` on curve lookup failure.
pub fn par_swap_rate<C: YieldCurve<f64>>(
    curve: &C,
    swaption: &MarketSwaption,
) -> Result<f64, PricingError> {
    let annuity = swap_annuity(curve, swaption)?;
    let floating =
        curve.discount_factor(swaption.tenor_start())? - curve.discount_factor(swaption.tenor_end())?;
    Ok(floating / annuity)
}

/// `(date, c_k)` with `c_k = K·δ_k` and the notional added on the last date.
fn coupon_flows(swaption: &MarketSwaption) -> Vec<(f64, f64)> {
    let schedule = swaption.fixed_schedule();
    let last = schedule.len() - 1;
    schedule
        .into_iter()
        .enumerate()
        .map(|(k, (date, accrual))| {
            let coupon = swaption.swap_rate() * accrual;
            (date, if k == last { coupon + 1.0 } else { coupon })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rates::HullWhiteParams;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use shortrate_core::market_data::curves::DiscountCurve;

    fn curve() -> DiscountCurve {
        DiscountCurve::from_maturities_and_prices(
            &[0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0],
            &[0.9880, 0.9760, 0.9510, 0.9250, 0.8700, 0.8150, 0.7400],
        )
        .unwrap()
    }

    fn params() -> HullWhiteParams {
        HullWhiteParams::new(0.08, 0.012).unwrap()
    }

    #[test]
    fn test_zero_coupon_bond_validation() {
        let c = curve();
        let model = HullWhiteModel::new(params(), &c);
        assert!(price_zero_coupon_bond(&model, -0.1, 1.0, 0.02).is_err());
        assert!(price_zero_coupon_bond(&model, 2.0, 1.0, 0.02).is_err());
        assert!(price_zero_coupon_bond(&model, 0.0, 1.0, f64::NAN).is_err());
        assert_eq!(price_zero_coupon_bond(&model, 3.0, 3.0, 0.02).unwrap(), 1.0);
    }

    #[test]
    fn test_bond_option_parity() {
        let c = curve();
        let model = HullWhiteModel::new(params(), &c);
        let (expiry, maturity, strike) = (1.0, 5.0, 0.9);
        let call = price_zero_coupon_bond_option(&model, expiry, maturity, strike, OptionType::Call)
            .unwrap();
        let put =
            price_zero_coupon_bond_option(&model, expiry, maturity, strike, OptionType::Put).unwrap();
        let forward = c.discount_factor(maturity).unwrap() - strike * c.discount_factor(expiry).unwrap();
        assert_abs_diff_eq!(call - put, forward, epsilon = 1e-14);
        assert!(call > 0.0 && put > 0.0);
    }

    #[test]
    fn test_bond_option_at_expiry_is_intrinsic() {
        let c = curve();
        let model = HullWhiteModel::new(params(), &c);
        let call = price_zero_coupon_bond_option(&model, 0.0, 2.0, 0.9, OptionType::Call).unwrap();
        assert_abs_diff_eq!(call, 0.951 - 0.9, epsilon = 1e-12);
        assert!(price_zero_coupon_bond_option(&model, 1.0, 0.5, 0.9, OptionType::Call).is_err());
        assert!(price_zero_coupon_bond_option(&model, 1.0, 2.0, 0.0, OptionType::Put).is_err());
    }

    #[test]
    fn test_payer_receiver_parity() {
        let c = curve();
        let model = HullWhiteModel::new(params(), &c);
        for (expiry, start, end, freq, strike) in [
            (1.0, 1.0, 5.0, 0.5, 0.02),
            (2.0, 2.0, 7.0, 1.0, 0.035),
            (0.5, 1.0, 4.3, 0.5, 0.05),
            (3.0, 3.0, 10.0, 0.25, 0.0),
        ] {
            let payer = MarketSwaption::new(strike, expiry, start, end, freq, 0.0).unwrap();
            let receiver = payer.with_kind(SwaptionType::Receiver);
            let p = price_swaption(&model, &payer).unwrap();
            let r = price_swaption(&model, &receiver).unwrap();
            assert!(p >= 0.0 && r >= 0.0);
            assert_abs_diff_eq!(p - r, forward_swap_value(&c, &payer).unwrap(), epsilon = 1e-11);
        }
    }

    #[test]
    fn test_atm_payer_equals_receiver() {
        let c = curve();
        let model = HullWhiteModel::new(params(), &c);
        let template = MarketSwaption::new(0.0, 2.0, 2.0, 7.0, 1.0, 0.0).unwrap();
        let atm = par_swap_rate(&c, &template).unwrap();
        let payer = MarketSwaption::new(atm, 2.0, 2.0, 7.0, 1.0, 0.0).unwrap();
        let receiver = payer.with_kind(SwaptionType::Receiver);
        assert_relative_eq!(
            price_swaption(&model, &payer).unwrap(),
            price_swaption(&model, &receiver).unwrap(),
            max_relative = 1e-8
        );
        assert_abs_diff_eq!(forward_swap_value(&c, &payer).unwrap(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_single_period_swaption_is_bond_option() {
        // One payment: a payer swaption is (1 + K·δ) puts on the end bond
        let c = curve();
        let model = HullWhiteModel::new(params(), &c);
        let (expiry, end, strike) = (1.0, 2.0, 0.03);
        let swaption = MarketSwaption::new(strike, expiry, expiry, end, 1.0, 0.0).unwrap();
        let notional = 1.0 + strike;
        let put = price_zero_coupon_bond_option(&model, expiry, end, 1.0 / notional, OptionType::Put)
            .unwrap();
        assert_relative_eq!(
            price_swaption(&model, &swaption).unwrap(),
            notional * put,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_price_increases_with_volatility() {
        let c = curve();
        let swaption = MarketSwaption::new(0.03, 1.0, 1.0, 6.0, 0.5, 0.0).unwrap();
        let mut previous = 0.0;
        for sigma in [0.002, 0.005, 0.01, 0.02] {
            let model = HullWhiteModel::new(HullWhiteParams::new(0.05, sigma).unwrap(), &c);
            let price = price_swaption(&model, &swaption).unwrap();
            assert!(price > previous);
            previous = price;
        }
    }

    #[test]
    fn test_bracket_failure_is_reported() {
        let c = curve();
        let model = HullWhiteModel::new(params(), &c);
        let swaption = MarketSwaption::new(0.03, 1.0, 1.0, 6.0, 0.5, 0.0).unwrap();
        let config = JamshidianConfig {
            lower: 30.0,
            upper: 31.0,
            max_half_width: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            price_swaption_with(&model, &swaption, &config),
            Err(PricingError::RootNotBracketed { .. })
        ));
    }

    #[test]
    fn test_annuity_and_par_rate_on_flat_curve() {
        let c = DiscountCurve::flat(0.04, &[1.0, 10.0]).unwrap();
        let swaption = MarketSwaption::new(0.0, 1.0, 1.0, 3.0, 1.0, 0.0).unwrap();
        let annuity = swap_annuity(&c, &swaption).unwrap();
        assert_relative_eq!(
            annuity,
            (-0.08_f64).exp() + (-0.12_f64).exp(),
            max_relative = 1e-12
        );
        // Annual compounding equivalent of a 4% continuous rate
        assert_relative_eq!(
            par_swap_rate(&c, &swaption).unwrap(),
            0.04_f64.exp() - 1.0,
            max_relative = 1e-10
        );
    }
}
