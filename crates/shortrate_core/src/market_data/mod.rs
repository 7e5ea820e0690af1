//! Market data structures for short-rate modelling.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and the validated [`DiscountCurve`]
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use shortrate_core::market_data::curves::{DiscountCurve, YieldCurve};
//!
//! let curve = DiscountCurve::flat(0.03, &[1.0, 5.0, 10.0]).unwrap();
//! let df = curve.discount_factor(2.0).unwrap();
//! assert!((df - (-0.06_f64).exp()).abs() < 1e-12);
//! ```

pub mod curves;
pub mod error;

pub use curves::{DiscountCurve, YieldCurve, YieldCurvePoint};
pub use error::MarketDataError;
