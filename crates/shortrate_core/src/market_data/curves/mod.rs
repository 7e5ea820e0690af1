//! Curve abstractions for interest rate calculations.
//!
//! This module provides:
//! - [`YieldCurve`]: Generic trait for discount factor and forward rate calculations
//! - [`DiscountCurve`]: Validated pillar curve with a smooth log-discount spline
//! - [`YieldCurvePoint`]: One observed `(maturity, price)` pillar

mod discount;
mod traits;

pub use discount::{DiscountCurve, YieldCurvePoint};
pub use traits::YieldCurve;
