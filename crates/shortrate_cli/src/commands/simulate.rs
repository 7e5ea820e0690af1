//! Simulate command implementation
//!
//! Generates short-rate paths under a stored model using the
//! shortrate_simulation crate and writes them as CSV.

use shortrate_simulation::rng::entropy_seed;
use shortrate_simulation::{moment_check, PathSimulator, ScenarioDefinition, SimulationConfig};
use std::fs::File;
use std::io::BufWriter;
use tracing::{debug, info};

use crate::io;
use crate::Result;

/// Arguments of the simulate command
#[derive(Debug, Clone)]
pub struct SimulateArgs<'a> {
    /// Model JSON written by `calibrate`
    pub model: &'a str,
    /// Number of paths
    pub paths: usize,
    /// Time horizon in years
    pub horizon: f64,
    /// Step size in years
    pub dt: f64,
    /// Shock CSV, rows are steps and columns are paths
    pub shocks: Option<&'a str>,
    /// Output CSV; stdout when absent
    pub output: Option<&'a str>,
}

/// Run the simulate command
pub fn run(args: &SimulateArgs<'_>, config: SimulationConfig) -> Result<()> {
    info!("Starting simulation...");
    info!("  Model: {}", args.model);
    info!(
        "  Paths: {}, horizon: {}, dt: {}",
        args.paths, args.horizon, args.dt
    );

    let file = io::read_model(args.model)?;
    let scenario = ScenarioDefinition::new(args.paths, args.horizon, args.dt)?;

    let shocks = match args.shocks {
        Some(path) => {
            info!("  Shocks: {}", path);
            Some(io::read_shocks(io::open_input(path)?)?)
        }
        None => None,
    };

    // Record the seed so that an unseeded run can be repeated
    let seed = config.seed.unwrap_or_else(entropy_seed);
    if shocks.is_none() {
        info!("  Seed: {}", seed);
    }
    let simulator = PathSimulator::new(config.with_seed(seed));
    let result = simulator.simulate(&file.model, &scenario, shocks.as_ref())?;

    let last = result.num_timesteps() - 1;
    let check = moment_check(&file.model, &result, last)?;
    debug!(
        "r({}) sample mean {:.6} (analytic {:.6}), sample variance {:.3e} (analytic {:.3e})",
        check.time,
        check.sample_mean,
        check.analytic_mean,
        check.sample_variance,
        check.analytic_variance
    );

    match args.output {
        Some(path) => {
            info!("Writing paths to: {}", path);
            io::write_paths(BufWriter::new(File::create(path)?), &result)?;
        }
        None => io::write_paths(std::io::stdout().lock(), &result)?,
    }

    info!("Simulation complete");
    Ok(())
}
