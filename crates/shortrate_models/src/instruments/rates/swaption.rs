//! European swaption quotes.
//!
//! A [`MarketSwaption`] is an option, expiring at `expiry`, to enter a swap
//! whose fixed leg runs from `tenor_start` to `tenor_end` with payments every
//! `fixed_payment_frequency` years at rate `swap_rate`, together with its
//! observed market price per unit notional.
//!
//! # Example
//!
//! ```
//! use shortrate_models::instruments::rates::{MarketSwaption, SwaptionType};
//!
//! // 1y into 2y, semi-annual, 3% strike
//! let swaption = MarketSwaption::new(0.03, 1.0, 1.0, 3.0, 0.5, 0.004).unwrap();
//! assert_eq!(swaption.kind(), SwaptionType::Payer);
//!
//! let dates: Vec<f64> = swaption.fixed_schedule().iter().map(|(t, _)| *t).collect();
//! assert_eq!(dates, vec![1.5, 2.0, 2.5, 3.0]);
//! ```

use shortrate_core::types::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Largest number of fixed-leg coupons a swaption may have.
pub const MAX_FIXED_PERIODS: usize = 1_000;

/// Swaption type (payer or receiver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SwaptionType {
    /// Right to enter a payer swap (pay fixed, receive floating).
    #[default]
    Payer,
    /// Right to enter a receiver swap (receive fixed, pay floating).
    Receiver,
}

impl fmt::Display for SwaptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwaptionType::Payer => write!(f, "payer"),
            SwaptionType::Receiver => write!(f, "receiver"),
        }
    }
}

impl FromStr for SwaptionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payer" | "pay" | "call" => Ok(SwaptionType::Payer),
            "receiver" | "receive" | "put" => Ok(SwaptionType::Receiver),
            other => Err(ValidationError::invalid(
                "option_type",
                format!("unknown swaption type '{other}'"),
            )),
        }
    }
}

/// Unvalidated swaption fields, as read from a file.
///
/// Convert with [`MarketSwaption::try_from`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwaptionQuote {
    /// Fixed rate of the underlying swap.
    pub swap_rate: f64,
    /// Option expiry in years.
    pub expiry: f64,
    /// Start of the underlying swap in years.
    pub tenor_start: f64,
    /// End of the underlying swap in years.
    pub tenor_end: f64,
    /// Fixed-leg payment interval in years (0.5 for semi-annual).
    #[cfg_attr(feature = "serde", serde(alias = "fixed_frequency"))]
    pub fixed_payment_frequency: f64,
    /// Observed price per unit notional.
    pub market_price: f64,
    /// Payer or receiver; payer when absent.
    #[cfg_attr(feature = "serde", serde(default, alias = "option_type"))]
    pub kind: SwaptionType,
}

/// Validated European swaption quote.
///
/// Immutable once built. Field invariants:
/// - every value finite
/// - `expiry >= 0`, `tenor_start >= expiry`, `tenor_end > tenor_start`
/// - `fixed_payment_frequency > 0`, `swap_rate >= 0`, `market_price >= 0`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SwaptionQuote", into = "SwaptionQuote")
)]
pub struct MarketSwaption {
    swap_rate: f64,
    expiry: f64,
    tenor_start: f64,
    tenor_end: f64,
    fixed_payment_frequency: f64,
    market_price: f64,
    kind: SwaptionType,
}

impl MarketSwaption {
    /// Create a payer swaption quote.
    ///
    /// # Errors
    ///
    /// `ValidationError::InvalidParameter` naming the first field that breaks
    /// an invariant.
    pub fn new(
        swap_rate: f64,
        expiry: f64,
        tenor_start: f64,
        tenor_end: f64,
        fixed_payment_frequency: f64,
        market_price: f64,
    ) -> Result<Self, ValidationError> {
        SwaptionQuote {
            swap_rate,
            expiry,
            tenor_start,
            tenor_end,
            fixed_payment_frequency,
            market_price,
            kind: SwaptionType::Payer,
        }
        .try_into()
    }

    /// Same quote with a different payer/receiver flag.
    pub fn with_kind(mut self, kind: SwaptionType) -> Self {
        self.kind = kind;
        self
    }

    /// Same quote with a different market price.
    ///
    /// # Errors
    ///
    /// `ValidationError::InvalidParameter` if `market_price` is negative or not finite.
    pub fn with_market_price(mut self, market_price: f64) -> Result<Self, ValidationError> {
        check_non_negative("market_price", market_price)?;
        self.market_price = market_price;
        Ok(self)
    }

    /// Fixed rate of the underlying swap.
    #[inline]
    pub fn swap_rate(&self) -> f64 {
        self.swap_rate
    }

    /// Option expiry in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Swap start in years.
    #[inline]
    pub fn tenor_start(&self) -> f64 {
        self.tenor_start
    }

    /// Swap end in years.
    #[inline]
    pub fn tenor_end(&self) -> f64 {
        self.tenor_end
    }

    /// Fixed-leg payment interval in years.
    #[inline]
    pub fn fixed_payment_frequency(&self) -> f64 {
        self.fixed_payment_frequency
    }

    /// Observed price per unit notional.
    #[inline]
    pub fn market_price(&self) -> f64 {
        self.market_price
    }

    /// Payer or receiver.
    #[inline]
    pub fn kind(&self) -> SwaptionType {
        self.kind
    }

    /// Fixed-leg payment dates with their accrual fractions.
    ///
    /// Dates are `tenor_start + k·Δ`; the last one is `tenor_end`, so a
    /// trailing stub shorter than `Δ` is possible. A stub shorter than
    /// `1e-6·Δ` is merged into the preceding period.
    pub fn fixed_schedule(&self) -> Vec<(f64, f64)> {
        let step = self.fixed_payment_frequency;
        let periods = fixed_periods(self.tenor_end - self.tenor_start, step) as usize;

        let mut schedule = Vec::with_capacity(periods);
        let mut previous = self.tenor_start;
        for k in 1..periods {
            let date = self.tenor_start + k as f64 * step;
            schedule.push((date, date - previous));
            previous = date;
        }
        schedule.push((self.tenor_end, self.tenor_end - previous));
        schedule
    }
}

impl TryFrom<SwaptionQuote> for MarketSwaption {
    type Error = ValidationError;

    fn try_from(q: SwaptionQuote) -> Result<Self, Self::Error> {
        check_non_negative("swap_rate", q.swap_rate)?;
        check_non_negative("expiry", q.expiry)?;
        check_non_negative("market_price", q.market_price)?;
        if !q.tenor_start.is_finite() || q.tenor_start < q.expiry {
            return Err(ValidationError::invalid(
                "tenor_start",
                format!("{} must be finite and not before expiry {}", q.tenor_start, q.expiry),
            ));
        }
        if !q.tenor_end.is_finite() || q.tenor_end <= q.tenor_start {
            return Err(ValidationError::invalid(
                "tenor_end",
                format!("{} must be finite and after tenor_start {}", q.tenor_end, q.tenor_start),
            ));
        }
        if !(q.fixed_payment_frequency.is_finite() && q.fixed_payment_frequency > 0.0) {
            return Err(ValidationError::invalid(
                "fixed_payment_frequency",
                format!("{} must be positive and finite", q.fixed_payment_frequency),
            ));
        }
        let periods = fixed_periods(q.tenor_end - q.tenor_start, q.fixed_payment_frequency);
        if periods > MAX_FIXED_PERIODS as f64 {
            return Err(ValidationError::invalid(
                "fixed_payment_frequency",
                format!(
                    "{} gives {periods} coupons, more than {MAX_FIXED_PERIODS}",
                    q.fixed_payment_frequency
                ),
            ));
        }
        Ok(Self {
            swap_rate: q.swap_rate,
            expiry: q.expiry,
            tenor_start: q.tenor_start,
            tenor_end: q.tenor_end,
            fixed_payment_frequency: q.fixed_payment_frequency,
            market_price: q.market_price,
            kind: q.kind,
        })
    }
}

impl From<MarketSwaption> for SwaptionQuote {
    fn from(s: MarketSwaption) -> Self {
        Self {
            swap_rate: s.swap_rate,
            expiry: s.expiry,
            tenor_start: s.tenor_start,
            tenor_end: s.tenor_end,
            fixed_payment_frequency: s.fixed_payment_frequency,
            market_price: s.market_price,
            kind: s.kind,
        }
    }
}

/// Coupon count for a leg of `length` years paying every `step` years.
fn fixed_periods(length: f64, step: f64) -> f64 {
    ((length / step) - 1e-6).ceil().max(1.0)
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            name,
            format!("{value} must be non-negative and finite"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_schedule_with_stub() {
        let s = MarketSwaption::new(0.03, 1.0, 1.0, 2.2, 0.5, 0.0).unwrap();
        let schedule = s.fixed_schedule();
        assert_eq!(schedule.len(), 3);
        assert_abs_diff_eq!(schedule[2].0, 2.2, epsilon = 1e-15);
        assert_abs_diff_eq!(schedule[2].1, 0.2, epsilon = 1e-12);
        let total: f64 = schedule.iter().map(|(_, d)| d).sum();
        assert_abs_diff_eq!(total, 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_schedule_absorbs_rounding() {
        // 10 quarterly periods where 2.5 / 0.25 is not exact in binary
        let s = MarketSwaption::new(0.02, 0.5, 0.7, 3.2, 0.25, 0.0).unwrap();
        let schedule = s.fixed_schedule();
        assert_eq!(schedule.len(), 10);
        assert_eq!(schedule[9].0, 3.2);
    }

    #[test]
    fn test_short_swap_single_period() {
        let s = MarketSwaption::new(0.02, 1.0, 1.0, 1.25, 1.0, 0.0).unwrap();
        assert_eq!(s.fixed_schedule(), vec![(1.25, 0.25)]);
    }

    #[test]
    fn test_validation() {
        assert!(MarketSwaption::new(-0.01, 1.0, 1.0, 2.0, 0.5, 0.0).is_err());
        assert!(MarketSwaption::new(0.01, -1.0, 1.0, 2.0, 0.5, 0.0).is_err());
        assert!(MarketSwaption::new(0.01, 1.0, 0.5, 2.0, 0.5, 0.0).is_err());
        assert!(MarketSwaption::new(0.01, 1.0, 1.0, 1.0, 0.5, 0.0).is_err());
        assert!(MarketSwaption::new(0.01, 1.0, 1.0, 2.0, 0.0, 0.0).is_err());
        assert!(MarketSwaption::new(0.01, 1.0, 1.0, 2.0, 0.5, -0.1).is_err());
        assert!(MarketSwaption::new(f64::NAN, 1.0, 1.0, 2.0, 0.5, 0.0).is_err());

        let err = MarketSwaption::new(0.01, 1.0, 1.0, 2.0, 0.5, -0.1).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidParameter { name: "market_price", .. }
        ));
    }

    #[test]
    fn test_rejects_excessive_coupon_count() {
        // 10y monthly is fine, 10y paying every 3 days is not
        let monthly = MarketSwaption::new(0.03, 1.0, 1.0, 11.0, 1.0 / 12.0, 0.0).unwrap();
        assert_eq!(monthly.fixed_schedule().len(), 120);
        assert!(MarketSwaption::new(0.03, 1.0, 1.0, 1001.0, 1.0, 0.0).is_ok());

        for frequency in [0.005, 1e-9, f64::MIN_POSITIVE] {
            let err = MarketSwaption::new(0.03, 1.0, 1.0, 11.0, frequency, 0.0).unwrap_err();
            assert!(matches!(
                err,
                ValidationError::InvalidParameter { name: "fixed_payment_frequency", .. }
            ));
        }
    }

    #[test]
    fn test_zero_expiry_and_forward_start_allowed() {
        assert!(MarketSwaption::new(0.03, 0.0, 0.0, 5.0, 1.0, 0.0).is_ok());
        assert!(MarketSwaption::new(0.03, 1.0, 2.0, 5.0, 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_builders() {
        let s = MarketSwaption::new(0.03, 1.0, 1.0, 3.0, 0.5, 0.0)
            .unwrap()
            .with_kind(SwaptionType::Receiver)
            .with_market_price(0.01)
            .unwrap();
        assert_eq!(s.kind(), SwaptionType::Receiver);
        assert_eq!(s.market_price(), 0.01);
        assert!(s.with_market_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_type_parsing() {
        assert_eq!("Payer".parse::<SwaptionType>(), Ok(SwaptionType::Payer));
        assert_eq!("receiver".parse::<SwaptionType>(), Ok(SwaptionType::Receiver));
        assert!("straddle".parse::<SwaptionType>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialise_validates() {
        let ok = r#"{"swap_rate":0.03,"expiry":1.0,"tenor_start":1.0,"tenor_end":3.0,
                     "fixed_frequency":0.5,"market_price":0.01,"option_type":"receiver"}"#;
        let s: MarketSwaption = serde_json::from_str(ok).unwrap();
        assert_eq!(s.kind(), SwaptionType::Receiver);
        assert_eq!(s.fixed_payment_frequency(), 0.5);

        let bad = r#"{"swap_rate":0.03,"expiry":2.0,"tenor_start":1.0,"tenor_end":3.0,
                      "fixed_payment_frequency":0.5,"market_price":0.01}"#;
        assert!(serde_json::from_str::<MarketSwaption>(bad).is_err());
    }
}
