//! Closed-form building blocks.
//!
//! - [`distributions`]: standard normal CDF and PDF
//! - [`bond_options`]: lognormal options exchanging one zero-coupon bond for another

pub mod bond_options;
pub mod distributions;

pub use bond_options::{bond_exchange_option, OptionType};
pub use distributions::{norm_cdf, norm_pdf};
