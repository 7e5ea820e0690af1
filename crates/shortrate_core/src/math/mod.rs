//! Mathematical utilities for numerical computation.
//!
//! - [`interpolators`]: Piecewise linear and natural cubic spline interpolation
//! - [`solvers`]: Root finding (Brent) and minimisation (Nelder-Mead, Levenberg-Marquardt)

pub mod interpolators;
pub mod solvers;
