//! Calibration error types.

use shortrate_core::types::{SolverError, ValidationError};
use shortrate_models::{CurveFittingError, PricingError};
use thiserror::Error;

/// Calibration failure.
///
/// # Variants
/// - `Validation`: The curve or the basket was rejected before any search
/// - `CurveFitting`: The curve cannot support θ(t); never absorbed as a penalty
/// - `Pricing`: The final parameters could not price the basket
/// - `NotConverged`: No run met its convergence test within the budget
/// - `InvalidConfig`: Bounds, start points or budgets are unusable
/// - `Solver`: An optimiser rejected its inputs
///
/// # Examples
/// ```
/// use shortrate_core::types::ValidationError;
/// use shortrate_optimiser::CalibrationError;
///
/// let err: CalibrationError = ValidationError::EmptyBasket.into();
/// assert!(matches!(err, CalibrationError::Validation(_)));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalibrationError {
    /// Input rejected before optimisation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Term-structure fitting failed.
    #[error(transparent)]
    CurveFitting(#[from] CurveFittingError),

    /// Re-pricing at the calibrated parameters failed.
    #[error("Pricing failed at calibrated parameters: {0}")]
    Pricing(#[from] PricingError),

    /// Best run did not converge.
    #[error(
        "Calibration did not converge after {iterations} iterations \
         (a = {mean_reversion}, sigma = {volatility}, error = {error})"
    )]
    NotConverged {
        /// Best mean reversion found
        mean_reversion: f64,
        /// Best volatility found
        volatility: f64,
        /// Sum of squared pricing errors at the best point
        error: f64,
        /// Iterations spent across all runs
        iterations: usize,
    },

    /// Configuration is unusable.
    #[error("Invalid calibration configuration: {0}")]
    InvalidConfig(String),

    /// Optimiser rejected its inputs.
    #[error("Optimiser failure: {0}")]
    Solver(#[from] SolverError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_converged_message() {
        let err = CalibrationError::NotConverged {
            mean_reversion: 0.12,
            volatility: 0.011,
            error: 3.5e-7,
            iterations: 800,
        };
        let msg = err.to_string();
        assert!(msg.contains("800 iterations"));
        assert!(msg.contains("0.011"));
    }

    #[test]
    fn test_conversions() {
        let err: CalibrationError = CurveFittingError::InvalidConfig("step".into()).into();
        assert!(matches!(err, CalibrationError::CurveFitting(_)));

        let err: CalibrationError = PricingError::RootNotBracketed {
            lower: -5.0,
            upper: 5.0,
        }
        .into();
        assert!(matches!(err, CalibrationError::Pricing(_)));
    }
}
