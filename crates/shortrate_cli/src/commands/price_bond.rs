//! Price-bond command implementation

use shortrate_models::instruments::rates::price_zero_coupon_bond;
use tracing::info;

use crate::io;
use crate::Result;

/// Run the price-bond command
///
/// Prints P(t, T) given r(t) = `short_rate` under a stored model.
pub fn run(model: &str, t: f64, maturity: f64, short_rate: f64) -> Result<()> {
    let file = io::read_model(model)?;
    info!(
        "Pricing P({}, {}) at r = {} with {} (a = {}, sigma = {})",
        t,
        maturity,
        short_rate,
        file.kind,
        file.model.mean_reversion(),
        file.model.volatility()
    );

    let price = price_zero_coupon_bond(&file.model.model(), t, maturity, short_rate)?;
    println!("{}", price);
    Ok(())
}
