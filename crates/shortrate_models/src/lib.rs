//! # shortrate_models (L2: Business Logic)
//!
//! Hull-White one-factor model and the closed-form pricing built on it.
//!
//! This crate provides:
//! - Model parameters, bond-price functions and analytic short-rate moments
//! - The term-structure fitter producing the drift table θ(t)
//! - Zero-coupon bond, bond option and Jamshidian swaption pricing
//! - Market swaption definitions and the model-kind registry
//!
//! ## Example
//!
//! ```
//! use shortrate_core::market_data::curves::DiscountCurve;
//! use shortrate_models::instruments::rates::{price_swaption, MarketSwaption};
//! use shortrate_models::models::rates::{HullWhiteModel, HullWhiteParams};
//!
//! let curve = DiscountCurve::flat(0.03, &[1.0, 2.0, 5.0, 10.0]).unwrap();
//! let params = HullWhiteParams::new(0.1, 0.01).unwrap();
//! let model = HullWhiteModel::new(params, &curve);
//!
//! let swaption = MarketSwaption::new(0.03, 1.0, 1.0, 6.0, 0.5, 0.0).unwrap();
//! let price = price_swaption(&model, &swaption).unwrap();
//! assert!(price > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod error;
pub mod instruments;
pub mod models;

pub use error::{CurveFittingError, PricingError};
