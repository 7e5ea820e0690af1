//! Nelder-Mead simplex minimiser with box constraints.
//!
//! The simplex moves in the logistic coordinates of
//! [`BoxConstraints::to_unbounded`], so the objective is never called outside
//! the box and a bound-active coordinate does not stall the others. The search
//! terminates when the simplex has collapsed both in parameter space and in
//! objective value, when the iteration cap is reached, or when an optional
//! wall-clock deadline passes.
//!
//! Reference: Nelder & Mead (1965), "A simplex method for function minimization".

use std::time::Instant;

use super::BoxConstraints;
use crate::types::SolverError;

/// Nelder-Mead configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NelderMeadConfig {
    /// Maximum number of simplex iterations.
    pub max_iterations: usize,
    /// Initial vertex offset as a fraction of each coordinate's box width.
    pub initial_step: f64,
    /// Reflection coefficient.
    pub reflection: f64,
    /// Expansion coefficient.
    pub expansion: f64,
    /// Contraction coefficient.
    pub contraction: f64,
    /// Shrink coefficient.
    pub shrink: f64,
    /// Largest vertex distance from the centroid accepted as collapsed.
    pub x_tolerance: f64,
    /// Relative objective spread accepted as collapsed.
    pub f_tolerance: f64,
    /// Absolute objective spread accepted as collapsed.
    pub f_abs_tolerance: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 400,
            initial_step: 0.1,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            x_tolerance: 1e-7,
            f_tolerance: 1e-10,
            f_abs_tolerance: 1e-22,
        }
    }
}

/// Why a minimisation run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// Simplex collapsed within tolerance.
    Converged,
    /// Iteration cap reached.
    MaxIterations,
    /// Wall-clock deadline passed.
    Deadline,
}

/// Outcome of a Nelder-Mead run.
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadResult {
    /// Best vertex found.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub value: f64,
    /// Simplex iterations performed.
    pub iterations: usize,
    /// Objective evaluations performed.
    pub evaluations: usize,
    /// Why the run stopped.
    pub reason: TerminationReason,
}

impl NelderMeadResult {
    /// True when the simplex collapsed within tolerance.
    #[inline]
    pub fn converged(&self) -> bool {
        self.reason == TerminationReason::Converged
    }
}

/// Derivative-free simplex minimiser.
///
/// # Example
///
/// ```
/// use shortrate_core::math::solvers::{BoxConstraints, NelderMeadSolver};
///
/// let bounds = BoxConstraints::new(vec![-5.0, -5.0], vec![5.0, 5.0]).unwrap();
/// let solver = NelderMeadSolver::with_defaults();
/// let result = solver
///     .minimise(|x| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2), &[0.0, 0.0], &bounds, None)
///     .unwrap();
/// assert!(result.converged());
/// assert!((result.x[0] - 1.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NelderMeadSolver {
    config: NelderMeadConfig,
}

impl NelderMeadSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: NelderMeadConfig) -> Self {
        Self { config }
    }

    /// Create a solver with [`NelderMeadConfig::default`].
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Solver configuration.
    pub fn config(&self) -> &NelderMeadConfig {
        &self.config
    }

    /// Minimise `objective` starting from `initial` inside `bounds`.
    ///
    /// Non-finite objective values are treated as `+∞`.
    ///
    /// # Errors
    ///
    /// `SolverError::NumericalInstability` when `initial` does not match the
    /// bounds' dimension.
    pub fn minimise<F>(
        &self,
        mut objective: F,
        initial: &[f64],
        bounds: &BoxConstraints,
        deadline: Option<Instant>,
    ) -> Result<NelderMeadResult, SolverError>
    where
        F: FnMut(&[f64]) -> f64,
    {
        let dim = bounds.dimension();
        if initial.len() != dim {
            return Err(SolverError::NumericalInstability(format!(
                "initial point has dimension {}, bounds have {}",
                initial.len(),
                dim
            )));
        }

        let cfg = &self.config;
        let mut evaluations = 0usize;
        let mut eval = |y: &[f64]| {
            evaluations += 1;
            let v = objective(&bounds.to_bounded(y));
            if v.is_finite() {
                v
            } else {
                f64::INFINITY
            }
        };

        // The simplex lives in logistic coordinates, so a coordinate whose
        // optimum is on a face cannot flatten the simplex for the others.
        let x0 = bounds.clamp(initial);
        let y0 = bounds.to_unbounded(&x0);
        let mut simplex = vec![y0.clone()];
        for d in 0..dim {
            let step = bounds.width(d) * cfg.initial_step;
            let mut x = x0.clone();
            x[d] = if x0[d] + step <= bounds.upper()[d] {
                x0[d] + step
            } else {
                x0[d] - step
            };
            let mut y = y0.clone();
            y[d] = bounds.to_unbounded(&x)[d];
            if y[d] == y0[d] {
                y[d] += 1.0;
            }
            simplex.push(y);
        }
        let mut values: Vec<f64> = simplex.iter().map(|y| eval(y)).collect();

        let mut iterations = 0usize;
        let mut reason = TerminationReason::MaxIterations;

        while iterations < cfg.max_iterations {
            sort_simplex(&mut simplex, &mut values);

            if self.collapsed(&simplex, &values, bounds) {
                reason = TerminationReason::Converged;
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                reason = TerminationReason::Deadline;
                break;
            }
            iterations += 1;

            let centroid = centroid(&simplex[..dim]);
            let worst = simplex[dim].clone();
            let along = |coef: f64, from: &[f64]| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(from)
                    .map(|(c, y)| c + coef * (y - c))
                    .collect()
            };

            let yr = along(-cfg.reflection, &worst);
            let fr = eval(&yr);

            if fr < values[0] {
                let ye = along(cfg.expansion, &yr);
                let fe = eval(&ye);
                if fe < fr {
                    simplex[dim] = ye;
                    values[dim] = fe;
                } else {
                    simplex[dim] = yr;
                    values[dim] = fr;
                }
                continue;
            }

            if fr < values[dim - 1] {
                simplex[dim] = yr;
                values[dim] = fr;
                continue;
            }

            // Outside contraction when the reflection improved on the worst vertex
            let (yc, fc) = if fr < values[dim] {
                let yc = along(cfg.contraction, &yr);
                let fc = eval(&yc);
                (yc, fc)
            } else {
                let yc = along(cfg.contraction, &worst);
                let fc = eval(&yc);
                (yc, fc)
            };
            if fc < values[dim].min(fr) {
                simplex[dim] = yc;
                values[dim] = fc;
                continue;
            }

            let best = simplex[0].clone();
            for i in 1..=dim {
                simplex[i] = best
                    .iter()
                    .zip(&simplex[i])
                    .map(|(b, y)| b + cfg.shrink * (y - b))
                    .collect();
                values[i] = eval(&simplex[i]);
            }
        }

        sort_simplex(&mut simplex, &mut values);
        Ok(NelderMeadResult {
            x: bounds.to_bounded(&simplex[0]),
            value: values[0],
            iterations,
            evaluations,
            reason,
        })
    }

    /// Collapse is judged on the box-side vertices, where a vertex pushed
    /// towards a face stops moving even though its logit keeps growing.
    fn collapsed(&self, simplex: &[Vec<f64>], values: &[f64], bounds: &BoxConstraints) -> bool {
        let best = values[0];
        let worst = values[values.len() - 1];
        if !worst.is_finite() {
            return false;
        }
        let spread = worst - best;
        let f_ok = spread <= self.config.f_tolerance * best.abs() + self.config.f_abs_tolerance;
        let points: Vec<Vec<f64>> = simplex.iter().map(|y| bounds.to_bounded(y)).collect();
        let centroid = centroid(&points);
        let x_spread = points
            .iter()
            .map(|x| {
                x.iter()
                    .zip(&centroid)
                    .map(|(a, c)| (a - c) * (a - c))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0_f64, f64::max);
        f_ok && x_spread <= self.config.x_tolerance
    }
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

fn centroid(points: &[Vec<f64>]) -> Vec<f64> {
    let n = points.len() as f64;
    (0..points[0].len())
        .map(|d| points.iter().map(|p| p[d]).sum::<f64>() / n)
        .collect()
}
