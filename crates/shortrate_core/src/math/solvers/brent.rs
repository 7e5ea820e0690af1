//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Combines bisection, secant steps and inverse quadratic interpolation.
/// Converges for any continuous function given a sign-changing bracket;
/// it never returns a point outside the bracket it was handed.
///
/// # Example
///
/// ```
/// use shortrate_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
/// let f = |x: f64| x * x * x - x - 2.0;
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with [`SolverConfig::default`].
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Find a root of `f` in `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// * `SolverError::NoBracket` - `f(lower)` and `f(upper)` share a sign
    /// * `SolverError::NumericalInstability` - `f` is not finite at an endpoint
    /// * `SolverError::MaxIterationsExceeded` - iteration cap reached
    pub fn find_root<F>(&self, f: F, lower: T, upper: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let fa = f(lower);
        let fb = f(upper);
        self.solve_bracketed(&f, (lower, fa), (upper, fb))
    }

    /// Find a root of `f`, widening `[lower, upper]` about its midpoint until
    /// the function changes sign or the half-width reaches `max_half_width`.
    ///
    /// The half-width doubles on each attempt and is capped at
    /// `max_half_width` for the final attempt.
    ///
    /// # Errors
    ///
    /// * `SolverError::NoBracket` - no sign change up to the widest bracket;
    ///   the error reports that bracket
    /// * any error from [`find_root`](Self::find_root)
    ///
    /// # Example
    ///
    /// ```
    /// use shortrate_core::math::solvers::BrentSolver;
    ///
    /// let solver = BrentSolver::<f64>::with_defaults();
    /// // Root at 3.0 lies outside the initial bracket
    /// let root = solver.find_root_expanding(|x| x - 3.0, -0.5, 0.5, 5.0).unwrap();
    /// assert!((root - 3.0).abs() < 1e-10);
    ///
    /// assert!(solver.find_root_expanding(|x| x - 30.0, -0.5, 0.5, 5.0).is_err());
    /// ```
    pub fn find_root_expanding<F>(
        &self,
        f: F,
        lower: T,
        upper: T,
        max_half_width: T,
    ) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let two = T::one() + T::one();
        let mid = (lower + upper) / two;
        let mut half = ((upper - lower) / two).abs();

        loop {
            let (a, b) = (mid - half, mid + half);
            let (fa, fb) = (f(a), f(b));
            if !fa.is_finite() || !fb.is_finite() {
                return Err(SolverError::NumericalInstability(format!(
                    "non-finite function value on bracket [{}, {}]",
                    a.to_f64().unwrap_or(f64::NAN),
                    b.to_f64().unwrap_or(f64::NAN)
                )));
            }
            if fa.signum() != fb.signum() || fa == T::zero() || fb == T::zero() {
                return self.solve_bracketed(&f, (a, fa), (b, fb));
            }
            if half >= max_half_width {
                return Err(SolverError::NoBracket {
                    a: a.to_f64().unwrap_or(f64::NAN),
                    b: b.to_f64().unwrap_or(f64::NAN),
                });
            }
            half = (half * two).min(max_half_width);
        }
    }

    fn solve_bracketed<F>(&self, f: &F, lower: (T, T), upper: (T, T)) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let (mut a, mut fa) = lower;
        let (mut b, mut fb) = upper;

        if !fa.is_finite() || !fb.is_finite() {
            return Err(SolverError::NumericalInstability(
                "non-finite function value at bracket endpoint".to_string(),
            ));
        }
        if fa == T::zero() {
            return Ok(a);
        }
        if fb == T::zero() {
            return Ok(b);
        }
        if fa.signum() == fb.signum() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        let one = T::one();
        let two = one + one;
        let three = two + one;
        let half = one / two;

        // c is the contrapoint: f(b) and f(c) always bracket the root
        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.config.max_iterations {
            if fb.signum() == fc.signum() {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol = two * T::epsilon() * b.abs() + half * self.config.tolerance;
            let xm = half * (c - b);
            if xm.abs() <= tol || fb == T::zero() {
                return Ok(b);
            }

            if e.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    // Secant step
                    (two * xm * s, one - s)
                } else {
                    // Inverse quadratic interpolation
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (two * xm * q * (q - r) - (b - a) * (r - one)),
                        (q - one) * (r - one) * (s - one),
                    )
                };
                if p > T::zero() {
                    q = -q;
                }
                p = p.abs();
                let limit = (three * xm * q - (tol * q).abs()).min((e * q).abs());
                if two * p < limit {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;
            b = if d.abs() > tol {
                b + d
            } else if xm > T::zero() {
                b + tol
            } else {
                b - tol
            };
            fb = f(b);
            if !fb.is_finite() {
                return Err(SolverError::NumericalInstability(format!(
                    "non-finite function value at x = {}",
                    b.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sqrt_two() {
        let solver = BrentSolver::<f64>::with_defaults();
        let root = solver.find_root(|x| x * x - 2.0, 0.0, 2.0).unwrap();
        assert_abs_diff_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-11);
    }

    #[test]
    fn test_reversed_bracket() {
        let solver = BrentSolver::<f64>::with_defaults();
        let root = solver.find_root(|x| x.cos() - x, 1.0, 0.0).unwrap();
        assert_abs_diff_eq!(root, 0.739_085_133_215_160_6, epsilon = 1e-11);
    }

    #[test]
    fn test_endpoint_root() {
        let solver = BrentSolver::<f64>::with_defaults();
        assert_eq!(solver.find_root(|x| x - 1.0, 1.0, 3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_steep_exponential_bond_like_function() {
        // Decreasing in x like a bond price in the short rate
        let f = |r: f64| 1.05 * (-4.0 * r).exp() + 0.05 * (-2.0 * r).exp() - 1.0;
        let solver = BrentSolver::<f64>::with_defaults();
        let root = solver.find_root(f, -0.5, 0.5).unwrap();
        assert!(f(root).abs() < 1e-10);
    }

    #[test]
    fn test_no_bracket() {
        let solver = BrentSolver::<f64>::with_defaults();
        let result = solver.find_root(|x| x * x + 1.0, -1.0, 1.0);
        assert_eq!(result, Err(SolverError::NoBracket { a: -1.0, b: 1.0 }));
    }

    #[test]
    fn test_expanding_bracket_finds_distant_root() {
        let solver = BrentSolver::<f64>::with_defaults();
        let root = solver
            .find_root_expanding(|x| 2.5 - x, -0.5, 0.5, 5.0)
            .unwrap();
        assert_abs_diff_eq!(root, 2.5, epsilon = 1e-11);
    }

    #[test]
    fn test_expanding_bracket_gives_up_at_limit() {
        let solver = BrentSolver::<f64>::with_defaults();
        let result = solver.find_root_expanding(|x| x * x + 1.0, -0.5, 0.5, 4.0);
        assert_eq!(result, Err(SolverError::NoBracket { a: -4.0, b: 4.0 }));
    }

    #[test]
    fn test_max_iterations() {
        let solver = BrentSolver::new(SolverConfig::new(1e-300_f64, 2));
        let result = solver.find_root(|x| x.powi(3) - 0.3, 0.0, 1.0);
        assert_eq!(
            result,
            Err(SolverError::MaxIterationsExceeded { iterations: 2 })
        );
    }

    #[test]
    fn test_nan_function_is_reported() {
        let solver = BrentSolver::<f64>::with_defaults();
        let result = solver.find_root(|_| f64::NAN, 0.0, 1.0);
        assert!(matches!(result, Err(SolverError::NumericalInstability(_))));
    }
}
