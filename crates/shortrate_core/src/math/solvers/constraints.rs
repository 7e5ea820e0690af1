//! Box constraints for bounded minimisation.

use crate::types::SolverError;

/// Per-coordinate lower and upper bounds.
///
/// # Example
///
/// ```
/// use shortrate_core::math::solvers::BoxConstraints;
///
/// let bounds = BoxConstraints::new(vec![0.0, -1.0], vec![1.0, 1.0]).unwrap();
/// assert_eq!(bounds.clamp(&[2.0, -3.0]), vec![1.0, -1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxConstraints {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl BoxConstraints {
    /// Create bounds; both vectors must be non-empty, equally long, finite and ordered.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, SolverError> {
        if lower.is_empty() || lower.len() != upper.len() {
            return Err(SolverError::NumericalInstability(format!(
                "bounds need equal non-zero dimensions, got {} and {}",
                lower.len(),
                upper.len()
            )));
        }
        if let Some(i) = (0..lower.len())
            .find(|&i| !lower[i].is_finite() || !upper[i].is_finite() || lower[i] > upper[i])
        {
            return Err(SolverError::NumericalInstability(format!(
                "invalid bound at index {}: [{}, {}]",
                i, lower[i], upper[i]
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Number of coordinates.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    /// Lower bounds.
    #[inline]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bounds.
    #[inline]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Project `x` onto the box.
    pub fn clamp(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .map(|(v, (lo, hi))| v.clamp(*lo, *hi))
            .collect()
    }

    /// Width of coordinate `i`.
    #[inline]
    pub fn width(&self, i: usize) -> f64 {
        self.upper[i] - self.lower[i]
    }

    /// Map a point of the box to unconstrained coordinates.
    ///
    /// Each free coordinate becomes the logit of its position in `[lo, hi]`,
    /// nudged off the faces so that points on a bound stay finite. Fixed
    /// coordinates (`lo == hi`) map to 0.
    pub fn to_unbounded(&self, x: &[f64]) -> Vec<f64> {
        const EDGE: f64 = 1e-9;
        x.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .map(|(v, (lo, hi))| {
                let width = hi - lo;
                if width <= 0.0 {
                    return 0.0;
                }
                let u = ((v - lo) / width).clamp(EDGE, 1.0 - EDGE);
                (u / (1.0 - u)).ln()
            })
            .collect()
    }

    /// Inverse of [`to_unbounded`](Self::to_unbounded); always lands inside the box.
    pub fn to_bounded(&self, y: &[f64]) -> Vec<f64> {
        let x: Vec<f64> = y
            .iter()
            .zip(self.lower.iter().zip(&self.upper))
            .map(|(z, (lo, hi))| lo + (hi - lo) / (1.0 + (-z).exp()))
            .collect();
        self.clamp(&x)
    }

    /// True when any coordinate of `x` lies within `eps` of a bound.
    pub fn hits_boundary(&self, x: &[f64], eps: f64) -> bool {
        x.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .any(|(v, (lo, hi))| (v - lo).abs() <= eps || (hi - v).abs() <= eps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_bounds() {
        assert!(BoxConstraints::new(vec![1.0], vec![0.0]).is_err());
        assert!(BoxConstraints::new(vec![], vec![]).is_err());
        assert!(BoxConstraints::new(vec![0.0, 0.0], vec![1.0]).is_err());
        assert!(BoxConstraints::new(vec![f64::NEG_INFINITY], vec![0.0]).is_err());
    }

    #[test]
    fn test_boundary_detection() {
        let bounds = BoxConstraints::new(vec![0.0, 0.0], vec![1.0, 2.0]).unwrap();
        assert!(bounds.hits_boundary(&[0.5, 2.0], 1e-12));
        assert!(!bounds.hits_boundary(&[0.5, 1.0], 1e-12));
        assert_eq!(bounds.width(1), 2.0);
    }

    #[test]
    fn test_unbounded_round_trip() {
        let bounds = BoxConstraints::new(vec![-2.0, 0.5, 3.0], vec![1.0, 4.0, 3.0]).unwrap();
        let x = [-0.5, 3.9, 3.0];
        let back = bounds.to_bounded(&bounds.to_unbounded(&x));
        for (a, b) in back.iter().zip(&x) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_to_bounded_stays_inside() {
        let bounds = BoxConstraints::new(vec![0.1, -1.0], vec![0.3, 1.0]).unwrap();
        for y in [[-1e3, 1e3], [800.0, -800.0], [0.0, 0.0]] {
            let x = bounds.to_bounded(&y);
            assert!((0.1..=0.3).contains(&x[0]));
            assert!((-1.0..=1.0).contains(&x[1]));
        }
        assert_eq!(bounds.to_bounded(&[1e3, -1e3]), vec![0.3, -1.0]);
        // Points on a face stay finite
        assert!(bounds.to_unbounded(&[0.1, 1.0]).iter().all(|v| v.is_finite()));
    }
}
