//! Market data error types.

use crate::types::InterpolationError;
use thiserror::Error;

/// Errors raised when querying a curve.
///
/// Construction problems are [`ValidationError`](crate::types::ValidationError)s;
/// this type covers lookups on an already validated curve.
///
/// # Examples
///
/// ```
/// use shortrate_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Negative or non-finite time.
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Interpolation error.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_interpolation_error() {
        let err: MarketDataError = InterpolationError::OutOfBounds {
            x: 2.0,
            min: 0.0,
            max: 1.0,
        }
        .into();
        assert!(matches!(err, MarketDataError::Interpolation(_)));
        assert!(err.to_string().starts_with("Interpolation error"));
    }
}
