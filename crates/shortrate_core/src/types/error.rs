//! Error types for structured error handling.
//!
//! This module provides:
//! - `ValidationError`: Malformed curves, swaptions, scenarios and shock matrices
//! - `InterpolationError`: Errors from interpolation operations
//! - `SolverError`: Errors from root-finding and minimisation routines

use thiserror::Error;

/// Input validation errors.
///
/// Raised before any fitting, pricing or simulation work begins. Every
/// variant carries enough context to locate the offending input.
///
/// # Variants
/// - `EmptyCurve`: No curve points supplied
/// - `InvalidMaturity`: Non-positive or non-finite pillar maturity
/// - `InvalidPrice`: Discount price outside (0, 1]
/// - `NonIncreasingMaturity`: Pillars not sorted by strictly increasing maturity
/// - `NonMonotonicCurve`: Discount price rises with maturity
/// - `InvalidParameter`: Scenario or instrument field out of range
/// - `NonDivisibleHorizon`: Horizon is not an integer multiple of the step
/// - `ShockShapeMismatch`: Supplied shocks do not match the simulation grid
///
/// # Examples
/// ```
/// use shortrate_core::types::ValidationError;
///
/// let err = ValidationError::NonMonotonicCurve { index: 3 };
/// assert!(format!("{}", err).contains("index 3"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No curve points were supplied.
    #[error("Discount curve has no points")]
    EmptyCurve,

    /// Pillar maturity is not a positive finite number.
    #[error("Invalid maturity {maturity} at index {index}: must be positive and finite")]
    InvalidMaturity {
        /// Position of the pillar in the input
        index: usize,
        /// The rejected maturity
        maturity: f64,
    },

    /// Discount price is outside (0, 1] or not finite.
    #[error("Invalid discount price {price} at index {index}: must lie in (0, 1]")]
    InvalidPrice {
        /// Position of the pillar in the input
        index: usize,
        /// The rejected price
        price: f64,
    },

    /// Maturities are not strictly increasing.
    #[error("Maturities must be strictly increasing: violation at index {index}")]
    NonIncreasingMaturity {
        /// Index of the first pillar that is not after its predecessor
        index: usize,
    },

    /// Discount prices increase with maturity.
    #[error("Discount prices must be non-increasing: violation at index {index}")]
    NonMonotonicCurve {
        /// Index of the first pillar priced above its predecessor
        index: usize,
    },

    /// A named parameter is out of range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// The swaption basket is empty.
    #[error("Calibration basket contains no swaptions")]
    EmptyBasket,

    /// Horizon is not an integer number of time steps.
    #[error("Time horizon {time_horizon} is not an integer multiple of dt = {dt}")]
    NonDivisibleHorizon {
        /// Requested horizon in years
        time_horizon: f64,
        /// Requested step in years
        dt: f64,
    },

    /// Shock matrix shape differs from `(num_timesteps - 1, num_paths)`.
    #[error(
        "Shock matrix shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}"
    )]
    ShockShapeMismatch {
        /// Required number of rows (time steps)
        expected_rows: usize,
        /// Required number of columns (paths)
        expected_cols: usize,
        /// Supplied number of rows
        rows: usize,
        /// Supplied number of columns
        cols: usize,
    },

    /// A shock row has a different length from the first row.
    #[error("Ragged shock matrix: row {row} has {len} entries, expected {expected}")]
    RaggedShocks {
        /// Offending row
        row: usize,
        /// Its length
        len: usize,
        /// Length of the first row
        expected: usize,
    },

    /// A shock draw is NaN or infinite.
    #[error("Non-finite shock at row {row}, column {col}")]
    NonFiniteShock {
        /// Row (time step) index
        row: usize,
        /// Column (path) index
        col: usize,
    },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Interpolation-related errors.
///
/// # Variants
/// - `OutOfBounds`: Query point outside valid interpolation domain
/// - `InsufficientData`: Not enough data points for interpolation
/// - `NonMonotonicData`: Abscissae are not strictly increasing
/// - `InvalidInput`: General invalid input error
///
/// # Examples
/// ```
/// use shortrate_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 5.0, min: 0.0, max: 3.0 };
/// assert!(format!("{}", err).contains("outside valid domain"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Query point outside valid interpolation domain.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Abscissae are not strictly increasing.
    #[error("Data is not strictly increasing at index {index}")]
    NonMonotonicData {
        /// Index where monotonicity violation was detected
        index: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Root-finding and minimisation errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `NoBracket`: Function values at bracket endpoints have same sign
/// - `NumericalInstability`: General numerical instability
///
/// # Examples
/// ```
/// use shortrate_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidPrice {
            index: 2,
            price: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "Invalid discount price 1.5 at index 2: must lie in (0, 1]"
        );

        let err = ValidationError::ShockShapeMismatch {
            expected_rows: 10,
            expected_cols: 100,
            rows: 9,
            cols: 100,
        };
        assert!(err.to_string().contains("expected 10x100, got 9x100"));
    }

    #[test]
    fn test_invalid_helper() {
        let err = ValidationError::invalid("dt", "must be positive");
        match err {
            ValidationError::InvalidParameter { name, reason } => {
                assert_eq!(name, "dt");
                assert_eq!(reason, "must be positive");
            }
            _ => panic!("Expected InvalidParameter"),
        }
    }

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::NoBracket { a: -0.5, b: 0.5 };
        assert_eq!(err.to_string(), "No bracket: f(-0.5) and f(0.5) have same sign");
    }

    #[test]
    fn test_errors_are_std_errors() {
        let _: &dyn std::error::Error = &ValidationError::EmptyCurve;
        let _: &dyn std::error::Error = &SolverError::NumericalInstability("x".into());
        let _: &dyn std::error::Error = &InterpolationError::InvalidInput("y".into());
    }
}
