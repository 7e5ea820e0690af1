//! Root-finding and minimisation solvers.
//!
//! ## Root-Finding
//!
//! - [`BrentSolver`]: Bracketing method without derivatives, with optional
//!   geometric bracket widening
//!
//! ## Minimisation
//!
//! - [`NelderMeadSolver`]: Derivative-free simplex search inside [`BoxConstraints`]
//! - [`LevenbergMarquardtSolver`]: Damped Gauss-Newton for least-squares residuals
//!
//! ## Configuration
//!
//! [`SolverConfig`] carries the tolerance and iteration cap for root finders;
//! [`NelderMeadConfig`] and [`LMConfig`] carry the minimiser settings.
//!
//! ## Example
//!
//! ```
//! use shortrate_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

mod brent;
mod config;
mod constraints;
mod levenberg_marquardt;
mod nelder_mead;

pub use brent::BrentSolver;
pub use config::SolverConfig;
pub use constraints::BoxConstraints;
pub use levenberg_marquardt::{LMConfig, LMResult, LevenbergMarquardtSolver};
pub use nelder_mead::{NelderMeadConfig, NelderMeadResult, NelderMeadSolver, TerminationReason};
