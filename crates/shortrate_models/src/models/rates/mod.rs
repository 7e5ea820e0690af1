//! Interest rate models.

pub mod calibrated;
pub mod hull_white;
pub mod theta;

pub use calibrated::CalibratedModel;
pub use hull_white::{b_function, HullWhiteModel, HullWhiteParams};
pub use theta::{FitterConfig, TermStructureFitter, ThetaTable};
