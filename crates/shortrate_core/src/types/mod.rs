//! Shared error types.
//!
//! - [`ValidationError`]: inputs rejected before any computation starts
//! - [`InterpolationError`]: interpolation domain and data errors
//! - [`SolverError`]: root-finding and optimisation failures

mod error;

pub use error::{InterpolationError, SolverError, ValidationError};
