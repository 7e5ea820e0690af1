//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Yield curve with instantaneous forward information.
///
/// # Contract
///
/// - `discount_factor(t)` returns P(0, t)
/// - `instantaneous_forward(t)` returns f(0, t) = -∂ ln P(0, t) / ∂t
/// - `forward_slope(t)` returns ∂f(0, t) / ∂t
///
/// # Invariants
///
/// - P(0, 0) = 1
/// - P(0, t) > 0 for all t >= 0
///
/// Negative or non-finite `t` is `MarketDataError::InvalidMaturity`.
pub trait YieldCurve<T: Float> {
    /// Discount factor P(0, t).
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Instantaneous forward rate f(0, t).
    fn instantaneous_forward(&self, t: T) -> Result<T, MarketDataError>;

    /// Time derivative of the instantaneous forward rate.
    fn forward_slope(&self, t: T) -> Result<T, MarketDataError>;

    /// Continuously compounded zero rate `-ln P(0, t) / t`.
    ///
    /// At `t = 0` this is the limit f(0, 0).
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t == T::zero() {
            return self.instantaneous_forward(t);
        }
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Simple continuously compounded forward rate between `t1` and `t2`.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        if !(t2 > t1) {
            return Err(MarketDataError::InvalidMaturity {
                t: t2.to_f64().unwrap_or(f64::NAN),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok((df1 / df2).ln() / (t2 - t1))
    }
}
