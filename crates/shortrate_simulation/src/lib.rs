//! # shortrate_simulation (L3: Simulation)
//!
//! Forward simulation of the Hull-White short rate.
//!
//! This crate provides:
//! - [`ScenarioDefinition`]: validated path count, horizon and step
//! - [`ShockMatrix`]: externally generated standard-normal draws
//! - [`PathSimulator`] / [`simulate`]: Euler-Maruyama paths, optionally in parallel
//! - [`martingale_check`] and [`moment_check`]: Monte Carlo diagnostics
//!   against the model's closed forms
//!
//! Paths are reproducible: with a fixed seed each path draws from its own
//! stream, so parallel and sequential runs give identical tables.
//!
//! ## Example
//!
//! ```rust
//! use shortrate_core::market_data::curves::DiscountCurve;
//! use shortrate_models::models::rates::{CalibratedModel, FitterConfig, HullWhiteParams};
//! use shortrate_simulation::{PathSimulator, ScenarioDefinition, SimulationConfig};
//!
//! let curve = DiscountCurve::flat(0.02, &[1.0, 5.0]).unwrap();
//! let params = HullWhiteParams::new(0.05, 0.008).unwrap();
//! let model = CalibratedModel::fit(params, curve, &FitterConfig::default(), 0.0).unwrap();
//!
//! let scenario = ScenarioDefinition::new(500, 2.0, 0.01).unwrap();
//! let result = PathSimulator::new(SimulationConfig::default().with_seed(42))
//!     .simulate(&model, &scenario, None)
//!     .unwrap();
//!
//! let moments = result.sample_moments(200).unwrap();
//! assert!(moments.mean.is_finite());
//! ```

#![warn(missing_docs)]

pub mod analysis;
pub mod config;
pub mod result;
pub mod rng;
pub mod scenario;
pub mod shocks;
pub mod simulator;

pub use analysis::{martingale_check, moment_check, MartingaleCheck, MomentCheck};
pub use config::SimulationConfig;
pub use result::{SampleMoments, SimulationResult};
pub use scenario::{ScenarioDefinition, MAX_CELLS, MAX_PATHS, MAX_STEPS};
pub use shocks::ShockMatrix;
pub use simulator::{simulate, PathSimulator};
