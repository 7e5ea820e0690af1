//! Short-rate models.
//!
//! - [`rates`]: Hull-White one-factor parameters, bond functions, θ fitting
//!   and the immutable calibrated model
//! - [`model_kind`]: registry of supported model kinds

pub mod model_kind;
pub mod rates;

pub use model_kind::{Capability, ModelFamily, ModelKind};
