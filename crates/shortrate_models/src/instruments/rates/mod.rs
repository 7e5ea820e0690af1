//! Interest rate instruments.
//!
//! - [`swaption`]: European swaption quotes used for calibration
//! - [`pricing`]: zero-coupon bonds, bond options and Jamshidian swaption pricing

pub mod pricing;
pub mod swaption;

pub use pricing::{
    forward_swap_value, par_swap_rate, price_swaption, price_swaption_with,
    price_zero_coupon_bond, price_zero_coupon_bond_option, swap_annuity, JamshidianConfig,
};
pub use swaption::{MarketSwaption, SwaptionQuote, SwaptionType, MAX_FIXED_PERIODS};
