//! Error types for term-structure fitting and pricing.

use shortrate_core::market_data::MarketDataError;
use shortrate_core::types::SolverError;
use thiserror::Error;

/// The initial curve cannot support θ(t) for the given parameters.
///
/// Raised by the term-structure fitter. During calibration this error aborts
/// the run instead of being absorbed as a penalty, because no choice of
/// parameters repairs a bad curve.
///
/// # Examples
/// ```
/// use shortrate_models::CurveFittingError;
///
/// let err = CurveFittingError::ForwardOutOfRange { t: 2.0, forward: 1.7, limit: 1.0 };
/// assert!(err.to_string().contains("1.7"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CurveFittingError {
    /// Implied instantaneous forward is non-finite or implausibly large.
    #[error("Implied forward rate {forward} at t = {t} exceeds |f| <= {limit}")]
    ForwardOutOfRange {
        /// Grid time
        t: f64,
        /// Offending forward rate
        forward: f64,
        /// Configured bound on |f|
        limit: f64,
    },

    /// θ evaluated to NaN or infinity.
    #[error("Non-finite drift theta({t}) = {value}")]
    NonFiniteTheta {
        /// Grid time
        t: f64,
        /// Offending value
        value: f64,
    },

    /// Fitter configuration is unusable.
    #[error("Invalid fitter configuration: {0}")]
    InvalidConfig(String),

    /// Curve lookup failed.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

/// A closed-form price could not be produced.
///
/// # Variants
/// - `InvalidInput`: Times, rates or strikes out of range
/// - `RootNotBracketed`: No Jamshidian critical rate inside the widest bracket
/// - `RootFinding`: The root finder failed inside a valid bracket
/// - `MarketData`: Curve lookup failed
///
/// # Examples
/// ```
/// use shortrate_core::types::SolverError;
/// use shortrate_models::PricingError;
///
/// let err: PricingError = SolverError::NoBracket { a: -5.0, b: 5.0 }.into();
/// assert!(matches!(err, PricingError::RootNotBracketed { .. }));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    /// Input out of range.
    #[error("Invalid pricing input: {0}")]
    InvalidInput(String),

    /// The critical-rate equation has no sign change in the search range.
    #[error("Critical rate not bracketed in [{lower}, {upper}]")]
    RootNotBracketed {
        /// Lower end of the widest bracket tried
        lower: f64,
        /// Upper end of the widest bracket tried
        upper: f64,
    },

    /// Root finder failure other than bracketing.
    #[error("Critical rate search failed: {0}")]
    RootFinding(SolverError),

    /// Curve lookup failed.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::NoBracket { a, b } => PricingError::RootNotBracketed {
                lower: a,
                upper: b,
            },
            other => PricingError::RootFinding(other),
        }
    }
}
