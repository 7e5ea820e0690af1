//! # shortrate_core (L1: Foundation)
//!
//! Foundation layer of the short-rate engine.
//!
//! This crate provides:
//! - Error types shared across the workspace ([`types`])
//! - Validated discount curves built from observed zero-coupon prices ([`market_data`])
//! - Interpolators and numerical solvers ([`math`])
//!
//! Nothing in this crate performs file or network I/O.
//!
//! ## Example
//!
//! ```
//! use shortrate_core::market_data::curves::{DiscountCurve, YieldCurve, YieldCurvePoint};
//!
//! let points = vec![
//!     YieldCurvePoint::new(1.0, 0.98),
//!     YieldCurvePoint::new(2.0, 0.96),
//!     YieldCurvePoint::new(5.0, 0.90),
//! ];
//! let curve = DiscountCurve::new(&points).unwrap();
//! assert!((curve.discount_factor(2.0).unwrap() - 0.96).abs() < 1e-12);
//! ```

#![warn(missing_docs)]

pub mod market_data;
pub mod math;
pub mod types;
