//! Options to exchange zero-coupon bonds under lognormal bond-price ratios.
//!
//! In a Gaussian short-rate model the ratio of two zero-coupon bond prices
//! is lognormal under the forward measure of the denominator bond. An option
//! at `T₀` to receive the bond maturing at `S` against `K` units of the bond
//! maturing at `U` (with `T₀ ≤ U ≤ S`) therefore has a Black-type price:
//!
//! ```text
//! h    = ln(P(0,S) / (K·P(0,U))) / σ_p + σ_p / 2
//! Call = P(0,S)·N(h) − K·P(0,U)·N(h − σ_p)
//! Put  = K·P(0,U)·N(σ_p − h) − P(0,S)·N(−h)
//! ```
//!
//! With `U = T₀` this is the ordinary zero-coupon bond option.

use super::distributions::norm_cdf;
use std::fmt;
use std::str::FromStr;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Right to buy the bond at the strike.
    Call,
    /// Right to sell the bond at the strike.
    Put,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(format!("unknown option type '{other}'")),
        }
    }
}

/// Price an option to exchange `strike` units of the numeraire bond for the
/// underlying bond.
///
/// # Arguments
///
/// * `option_type` - Call receives the underlying, put delivers it
/// * `underlying_discount` - P(0, S)
/// * `numeraire_discount` - P(0, U)
/// * `strike` - Units of the numeraire bond exchanged (positive)
/// * `sigma_p` - Standard deviation of ln(P(T₀,S)/P(T₀,U)); zero gives intrinsic value
///
/// # Examples
/// ```
/// use shortrate_models::analytical::{bond_exchange_option, OptionType};
///
/// let call = bond_exchange_option(OptionType::Call, 0.90, 0.97, 0.92, 0.01);
/// let put = bond_exchange_option(OptionType::Put, 0.90, 0.97, 0.92, 0.01);
/// // Parity: C − P = P(0,S) − K·P(0,U)
/// assert!((call - put - (0.90 - 0.92 * 0.97)).abs() < 1e-14);
/// ```
pub fn bond_exchange_option(
    option_type: OptionType,
    underlying_discount: f64,
    numeraire_discount: f64,
    strike: f64,
    sigma_p: f64,
) -> f64 {
    let forward_leg = underlying_discount;
    let strike_leg = strike * numeraire_discount;

    if sigma_p <= 0.0 {
        return match option_type {
            OptionType::Call => (forward_leg - strike_leg).max(0.0),
            OptionType::Put => (strike_leg - forward_leg).max(0.0),
        };
    }

    let h = (forward_leg / strike_leg).ln() / sigma_p + 0.5 * sigma_p;
    match option_type {
        OptionType::Call => forward_leg * norm_cdf(h) - strike_leg * norm_cdf(h - sigma_p),
        OptionType::Put => strike_leg * norm_cdf(sigma_p - h) - forward_leg * norm_cdf(-h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_vol_is_intrinsic() {
        assert_eq!(bond_exchange_option(OptionType::Call, 0.9, 1.0, 0.85, 0.0), 0.9 - 0.85);
        assert_eq!(bond_exchange_option(OptionType::Put, 0.9, 1.0, 0.85, 0.0), 0.0);
        assert_abs_diff_eq!(
            bond_exchange_option(OptionType::Put, 0.8, 0.95, 1.0, 0.0),
            0.15,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_prices_are_bounded() {
        for sigma_p in [0.001, 0.01, 0.1, 0.5] {
            for strike in [0.8, 0.9, 1.0] {
                let call = bond_exchange_option(OptionType::Call, 0.88, 0.97, strike, sigma_p);
                let put = bond_exchange_option(OptionType::Put, 0.88, 0.97, strike, sigma_p);
                assert!(call >= 0.0 && call <= 0.88);
                assert!(put >= 0.0 && put <= strike * 0.97);
                assert_abs_diff_eq!(call - put, 0.88 - strike * 0.97, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_value_increases_with_vol() {
        let low = bond_exchange_option(OptionType::Call, 0.9, 0.97, 0.93, 0.01);
        let high = bond_exchange_option(OptionType::Call, 0.9, 0.97, 0.93, 0.05);
        assert!(high > low);
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!("Call".parse::<OptionType>(), Ok(OptionType::Call));
        assert_eq!(" put ".parse::<OptionType>(), Ok(OptionType::Put));
        assert!("straddle".parse::<OptionType>().is_err());
        assert_eq!(OptionType::Put.to_string(), "put");
    }
}
