//! Levenberg-Marquardt nonlinear least-squares solver.
//!
//! # Algorithm
//!
//! ```text
//! (J^T J + λ·diag(J^T J)) δ = -J^T r
//! p_{n+1} = clamp(p_n + δ)
//! ```
//!
//! `J` is a forward-difference Jacobian of the residual vector `r`. Accepted
//! steps shrink the damping `λ`; rejected steps grow it. Trial points are
//! projected onto optional [`BoxConstraints`].
//!
//! # Example
//!
//! ```
//! use shortrate_core::math::solvers::{LMConfig, LevenbergMarquardtSolver};
//!
//! let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let ys: Vec<f64> = xs.iter().map(|x: &f64| 2.0 * (-0.7 * x).exp()).collect();
//!
//! let residuals = |p: &[f64]| -> Vec<f64> {
//!     xs.iter().zip(&ys).map(|(x, y)| p[0] * (-p[1] * x).exp() - y).collect()
//! };
//!
//! let solver = LevenbergMarquardtSolver::new(LMConfig::default());
//! let result = solver.solve(residuals, vec![1.0, 1.0], None).unwrap();
//! assert!(result.converged);
//! assert!((result.params[1] - 0.7).abs() < 1e-6);
//! ```

use super::BoxConstraints;
use crate::types::SolverError;

/// Configuration for the Levenberg-Marquardt solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LMConfig {
    /// Residual norm below which the fit is exact enough.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Initial damping factor.
    pub initial_lambda: f64,
    /// Factor applied to λ on a rejected step.
    pub lambda_up: f64,
    /// Factor applied to λ on an accepted step.
    pub lambda_down: f64,
    /// Damping ceiling; reaching it means no descent direction remains.
    pub max_lambda: f64,
    /// Relative step size below which the parameters have settled.
    pub param_tolerance: f64,
    /// Relative reduction of the residual sum of squares below which progress has stalled.
    pub ss_tolerance: f64,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 100,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            max_lambda: 1e12,
            param_tolerance: 1e-10,
            ss_tolerance: 1e-14,
        }
    }
}

/// Result of a Levenberg-Marquardt run.
#[derive(Debug, Clone, PartialEq)]
pub struct LMResult {
    /// Final parameters.
    pub params: Vec<f64>,
    /// Residuals at `params`.
    pub residuals: Vec<f64>,
    /// Residual sum of squares at `params`.
    pub residual_ss: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether a convergence criterion was met.
    pub converged: bool,
}

impl LMResult {
    /// Root mean square of the residuals.
    pub fn rmse(&self) -> f64 {
        if self.residuals.is_empty() {
            return 0.0;
        }
        (self.residual_ss / self.residuals.len() as f64).sqrt()
    }
}

/// Levenberg-Marquardt least-squares solver.
///
/// Minimises `||r(p)||²` for a residual function `r`.
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardtSolver {
    config: LMConfig,
}

impl LevenbergMarquardtSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: LMConfig) -> Self {
        Self { config }
    }

    /// Create a solver with [`LMConfig::default`].
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }

    /// Solve the least-squares problem from `initial`.
    ///
    /// Returns the best point reached even when no convergence criterion is
    /// met; callers inspect [`LMResult::converged`].
    ///
    /// # Errors
    ///
    /// `SolverError::NumericalInstability` for empty parameter or residual
    /// vectors, a dimension mismatch with `bounds`, or non-finite residuals at
    /// the starting point.
    pub fn solve<F>(
        &self,
        residuals: F,
        initial: Vec<f64>,
        bounds: Option<&BoxConstraints>,
    ) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let n_params = initial.len();
        if n_params == 0 {
            return Err(SolverError::NumericalInstability(
                "empty parameter vector".to_string(),
            ));
        }
        if let Some(b) = bounds {
            if b.dimension() != n_params {
                return Err(SolverError::NumericalInstability(format!(
                    "bounds have dimension {}, parameters {}",
                    b.dimension(),
                    n_params
                )));
            }
        }
        let project = |p: Vec<f64>| match bounds {
            Some(b) => b.clamp(&p),
            None => p,
        };

        let mut params = project(initial);
        let mut r = residuals(&params);
        if r.is_empty() {
            return Err(SolverError::NumericalInstability(
                "empty residual vector".to_string(),
            ));
        }
        let mut ss = sum_of_squares(&r);
        if !ss.is_finite() {
            return Err(SolverError::NumericalInstability(
                "non-finite residuals at initial parameters".to_string(),
            ));
        }

        let cfg = &self.config;
        let mut lambda = cfg.initial_lambda;
        let mut iterations = 0;

        while iterations < cfg.max_iterations {
            if ss.sqrt() < cfg.tolerance {
                return Ok(self.finish(params, r, ss, iterations, true));
            }
            iterations += 1;

            let jacobian = forward_jacobian(&residuals, &params, &r, bounds);
            let Some(delta) = damped_step(&jacobian, &r, lambda) else {
                lambda *= cfg.lambda_up;
                if lambda > cfg.max_lambda {
                    return Ok(self.finish(params, r, ss, iterations, true));
                }
                continue;
            };

            let trial = project(params.iter().zip(&delta).map(|(p, d)| p + d).collect());
            let step_norm = norm(
                &trial
                    .iter()
                    .zip(&params)
                    .map(|(t, p)| t - p)
                    .collect::<Vec<_>>(),
            );
            if step_norm <= cfg.param_tolerance * norm(&params).max(1.0) {
                return Ok(self.finish(params, r, ss, iterations, true));
            }

            let trial_r = residuals(&trial);
            let trial_ss = sum_of_squares(&trial_r);

            if trial_ss.is_finite() && trial_ss < ss {
                let reduction = (ss - trial_ss) / ss.max(f64::MIN_POSITIVE);
                params = trial;
                r = trial_r;
                ss = trial_ss;
                lambda = (lambda * cfg.lambda_down).max(1e-15);
                if reduction < cfg.ss_tolerance {
                    return Ok(self.finish(params, r, ss, iterations, true));
                }
            } else {
                lambda *= cfg.lambda_up;
                if lambda > cfg.max_lambda {
                    // No downhill step at any damping: a stationary point
                    return Ok(self.finish(params, r, ss, iterations, true));
                }
            }
        }

        let converged = ss.sqrt() < cfg.tolerance;
        Ok(self.finish(params, r, ss, iterations, converged))
    }

    fn finish(
        &self,
        params: Vec<f64>,
        residuals: Vec<f64>,
        residual_ss: f64,
        iterations: usize,
        converged: bool,
    ) -> LMResult {
        LMResult {
            params,
            residuals,
            residual_ss,
            iterations,
            converged,
        }
    }
}

/// Forward-difference Jacobian, stepping backwards at an upper bound.
fn forward_jacobian<F>(
    residuals: &F,
    params: &[f64],
    r0: &[f64],
    bounds: Option<&BoxConstraints>,
) -> Vec<Vec<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let mut jacobian = vec![vec![0.0; params.len()]; r0.len()];
    for j in 0..params.len() {
        let mut h = 1e-7 * params[j].abs().max(1.0);
        if let Some(b) = bounds {
            if params[j] + h > b.upper()[j] {
                h = -h;
            }
        }
        let mut bumped = params.to_vec();
        bumped[j] += h;
        let r_bumped = residuals(&bumped);
        for (i, row) in jacobian.iter_mut().enumerate() {
            row[j] = (r_bumped[i] - r0[i]) / h;
        }
    }
    jacobian
}

/// Solve `(JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr`; `None` when the system is singular.
fn damped_step(jacobian: &[Vec<f64>], r: &[f64], lambda: f64) -> Option<Vec<f64>> {
    let n = jacobian.first()?.len();
    let mut normal = vec![vec![0.0; n]; n];
    let mut rhs = vec![0.0; n];
    for (row, ri) in jacobian.iter().zip(r) {
        for i in 0..n {
            rhs[i] -= row[i] * ri;
            for j in 0..n {
                normal[i][j] += row[i] * row[j];
            }
        }
    }
    for (i, row) in normal.iter_mut().enumerate() {
        row[i] += lambda * row[i].max(1e-12);
    }
    cholesky_solve(&normal, &rhs)
}

/// Solve `A x = b` for symmetric positive definite `A`.
fn cholesky_solve(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let s = a[i][j] - (0..j).map(|k| l[i][k] * l[j][k]).sum::<f64>();
            if i == j {
                if !(s > 0.0) {
                    return None;
                }
                l[i][i] = s.sqrt();
            } else {
                l[i][j] = s / l[j][j];
            }
        }
    }

    let mut y = vec![0.0; n];
    for i in 0..n {
        y[i] = (b[i] - (0..i).map(|k| l[i][k] * y[k]).sum::<f64>()) / l[i][i];
    }
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        x[i] = (y[i] - (i + 1..n).map(|k| l[k][i] * x[k]).sum::<f64>()) / l[i][i];
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

#[inline]
fn sum_of_squares(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

#[inline]
fn norm(v: &[f64]) -> f64 {
    sum_of_squares(v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_residuals() {
        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver
            .solve(|p| vec![p[0] - 2.0, p[1] + 3.0], vec![0.0, 0.0], None)
            .unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.params[0], 2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(result.params[1], -3.0, epsilon = 1e-8);
    }

    #[test]
    fn test_rosenbrock_residuals() {
        let solver = LevenbergMarquardtSolver::new(LMConfig {
            max_iterations: 500,
            ..Default::default()
        });
        let result = solver
            .solve(
                |p| vec![1.0 - p[0], 10.0 * (p[1] - p[0] * p[0])],
                vec![-1.2, 1.0],
                None,
            )
            .unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.params[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.params[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_respects_bounds() {
        let bounds = BoxConstraints::new(vec![-1.0, -1.0], vec![1.0, 1.0]).unwrap();
        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver
            .solve(|p| vec![p[0] - 4.0, p[1] - 0.5], vec![0.0, 0.0], Some(&bounds))
            .unwrap();
        assert!(result.params[0] <= 1.0);
        assert_abs_diff_eq!(result.params[0], 1.0, epsilon = 1e-8);
        assert_abs_diff_eq!(result.params[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_overdetermined_fit_with_noise_floor() {
        // Residuals cannot all vanish; the solver stops at the least-squares point
        let data = [(0.0, 1.0), (1.0, 3.1), (2.0, 4.9), (3.0, 7.2)];
        let solver = LevenbergMarquardtSolver::with_defaults();
        let result = solver
            .solve(
                |p| data.iter().map(|(x, y)| p[0] + p[1] * x - y).collect(),
                vec![0.0, 0.0],
                None,
            )
            .unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.params[1], 2.04, epsilon = 1e-6);
        assert_abs_diff_eq!(result.params[0], 0.99, epsilon = 1e-6);
        assert!(result.rmse() > 0.0);
    }

    #[test]
    fn test_rejects_empty_input() {
        let solver = LevenbergMarquardtSolver::with_defaults();
        assert!(solver.solve(|_| vec![1.0], vec![], None).is_err());
        assert!(solver.solve(|_| vec![], vec![1.0], None).is_err());
        assert!(solver.solve(|_| vec![f64::NAN], vec![1.0], None).is_err());
    }

    #[test]
    fn test_cholesky_solve() {
        let a = vec![vec![4.0, 2.0], vec![2.0, 3.0]];
        let x = cholesky_solve(&a, &[2.0, 1.0]).unwrap();
        assert_abs_diff_eq!(x[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 0.0, epsilon = 1e-12);
        assert!(cholesky_solve(&[vec![0.0]], &[1.0]).is_none());
    }
}
