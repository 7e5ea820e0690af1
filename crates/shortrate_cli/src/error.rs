//! CLI error types.

use shortrate_core::types::ValidationError;
use shortrate_models::PricingError;
use shortrate_optimiser::CalibrationError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Argument or file content out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON read or write failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Market data rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Calibration failed.
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// Pricing failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// CLI result type.
pub type Result<T> = std::result::Result<T, CliError>;
