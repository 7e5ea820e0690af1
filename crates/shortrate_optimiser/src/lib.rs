//! # shortrate_optimiser (L2.5: Calibration)
//!
//! Fits Hull-White mean reversion and volatility to a basket of European
//! swaptions.
//!
//! ## Architecture Position
//!
//! Sits between Models (L2) and Simulation (L3): it solves the inverse
//! problem that turns market quotes into a [`CalibratedModel`] which the
//! simulator then consumes.
//!
//! ## Method
//!
//! - Parameters are searched in log space inside configurable bounds
//! - Nelder-Mead from several starting points, run one after another
//! - Levenberg-Marquardt polish of the best candidate
//! - Instruments that cannot be priced at a trial point are penalised
//!   instead of aborting the search
//!
//! The search is local; a multi-start grid reduces but does not remove the
//! risk of stopping in a local minimum.
//!
//! ## Example
//!
//! ```
//! use shortrate_core::market_data::curves::YieldCurvePoint;
//! use shortrate_models::instruments::rates::MarketSwaption;
//! use shortrate_optimiser::{CalibrationConfig, HullWhiteCalibrator};
//!
//! let curve: Vec<YieldCurvePoint> = [(1.0, 0.97), (2.0, 0.94), (5.0, 0.86), (10.0, 0.74)]
//!     .iter()
//!     .map(|&(t, p)| YieldCurvePoint::new(t, p))
//!     .collect();
//! let swaption = MarketSwaption::new(0.03, 1.0, 1.0, 5.0, 1.0, 0.012).unwrap();
//!
//! let calibrator = HullWhiteCalibrator::new(CalibrationConfig::default().with_fixed_mean_reversion(0.1));
//! let model = calibrator.calibrate(&curve, &[swaption]).unwrap();
//! assert_eq!(model.mean_reversion(), 0.1);
//! assert!(model.calibration_error() < 1e-10);
//! ```
//!
//! [`CalibratedModel`]: shortrate_models::models::rates::CalibratedModel

#![warn(missing_docs)]

pub mod calibration;

mod error;

pub use calibration::{
    calibrate, CalibrationConfig, CalibrationReport, HullWhiteCalibrator, InstrumentFit,
};
pub use error::CalibrationError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::calibration::*;
    pub use crate::CalibrationError;
}
