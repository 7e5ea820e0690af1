//! Subcommand implementations

pub mod calibrate;
pub mod models;
pub mod price_bond;
pub mod simulate;
