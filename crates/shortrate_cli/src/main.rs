//! Shortrate CLI - Command Line Operations for the Hull-White Engine
//!
//! This is the file-based entry point for the short-rate libraries.
//!
//! # Commands
//!
//! - `shortrate calibrate --curve <csv> --swaptions <csv>` - Fit `(a, σ)` to a swaption basket
//! - `shortrate simulate --model <json>` - Generate short-rate paths
//! - `shortrate price-bond --model <json>` - Price a zero-coupon bond
//! - `shortrate models` - List registered model kinds
//!
//! # Architecture
//!
//! As the **S**ervice layer, this crate only reads and writes files; the
//! core crates never call back into it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod io;

pub use error::{CliError, Result};

/// Hull-White short-rate engine CLI
#[derive(Parser)]
#[command(name = "shortrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "shortrate.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Disable parallel pricing and path generation
    #[arg(long, global = true)]
    sequential: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calibrate Hull-White parameters to market swaptions
    Calibrate {
        /// Curve CSV (Maturity,Price)
        #[arg(long)]
        curve: String,

        /// Swaption CSV
        #[arg(short, long)]
        swaptions: String,

        /// Hold mean reversion fixed and fit volatility only
        #[arg(long)]
        fixed_mean_reversion: Option<f64>,

        /// Output file for the calibrated model (stdout when absent)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Simulate short-rate paths under a calibrated model
    Simulate {
        /// Calibrated model JSON
        #[arg(short, long)]
        model: String,

        /// Number of Monte Carlo paths
        #[arg(short, long, default_value = "1000")]
        paths: usize,

        /// Time horizon in years
        #[arg(long, default_value = "30")]
        horizon: f64,

        /// Time step in years
        #[arg(long, default_value = "0.25")]
        dt: f64,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Shock CSV replacing the generated normals
        #[arg(long)]
        shocks: Option<String>,

        /// Output CSV for the paths (stdout when absent)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Price a zero-coupon bond P(t, T) given r(t)
    PriceBond {
        /// Calibrated model JSON
        #[arg(short, long)]
        model: String,

        /// Valuation time t in years
        #[arg(short = 't', long = "time", allow_negative_numbers = true)]
        t: f64,

        /// Bond maturity T in years
        #[arg(short = 'T', long)]
        maturity: f64,

        /// Short rate r(t)
        #[arg(short, long, allow_negative_numbers = true)]
        rate: f64,
    },

    /// List registered model kinds
    Models,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let seed = match &cli.command {
        Commands::Simulate { seed, .. } => *seed,
        _ => None,
    };
    let args = config::CliArgs {
        config_file: Some(PathBuf::from(&cli.config)),
        log_level: cli.log_level.clone(),
        verbose: cli.verbose,
        seed,
        sequential: cli.sequential,
    };
    let mut config = config::build_config(&args)?;

    init_tracing(config.log_level.as_filter_str());

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    debug!("Configuration: {:?}", config);

    match cli.command {
        Commands::Calibrate {
            curve,
            swaptions,
            fixed_mean_reversion,
            output,
        } => {
            if let Some(a) = fixed_mean_reversion {
                config.calibration = config.calibration.with_fixed_mean_reversion(a);
                config.validate()?;
            }
            commands::calibrate::run(&curve, &swaptions, output.as_deref(), &config.calibration)
        }
        Commands::Simulate {
            model,
            paths,
            horizon,
            dt,
            seed: _,
            shocks,
            output,
        } => commands::simulate::run(
            &commands::simulate::SimulateArgs {
                model: &model,
                paths,
                horizon,
                dt,
                shocks: shocks.as_deref(),
                output: output.as_deref(),
            },
            config.simulation,
        ),
        Commands::PriceBond {
            model,
            t,
            maturity,
            rate,
        } => commands::price_bond::run(&model, t, maturity, rate),
        Commands::Models => commands::models::run(),
    }
}
