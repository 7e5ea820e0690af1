//! Hull-White calibration.
//!
//! - [`HullWhiteCalibrator`]: configured calibration with diagnostics
//! - [`calibrate`]: calibration with default settings
//! - [`CalibrationConfig`]: bounds, start points, budgets and penalties
//! - [`CalibrationReport`]: per-instrument fit and run statistics

mod config;
mod hull_white;
mod objective;
mod report;

pub use config::{CalibrationConfig, DEFAULT_MEAN_REVERSION_STARTS, DEFAULT_VOLATILITY_STARTS};
pub use hull_white::{calibrate, HullWhiteCalibrator};
pub use report::{CalibrationReport, InstrumentFit};
