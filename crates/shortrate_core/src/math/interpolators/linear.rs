//! Linear interpolation implementation.

use super::{segment_index, validate_grid, Interpolator};
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator over a strictly increasing grid.
///
/// Used for tabulated functions of time, where the grid is produced in order
/// and an unsorted input indicates a bug upstream rather than something to
/// silently repair.
///
/// # Example
///
/// ```
/// use shortrate_core::math::interpolators::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, 2.0, 4.0, 6.0]).unwrap();
/// assert_eq!(interp.domain(), (0.0, 3.0));
/// let y: f64 = interp.interpolate(2.25).unwrap();
/// assert!((y - 4.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "LinearGrid<T>",
        bound(deserialize = "T: Float + serde::Deserialize<'de>")
    )
)]
pub struct LinearInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
}

/// Unchecked serialised grid; goes through [`LinearInterpolator::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct LinearGrid<T> {
    xs: Vec<T>,
    ys: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: Float> TryFrom<LinearGrid<T>> for LinearInterpolator<T> {
    type Error = InterpolationError;

    fn try_from(grid: LinearGrid<T>) -> Result<Self, Self::Error> {
        Self::new(&grid.xs, &grid.ys)
    }
}

impl<T: Float> LinearInterpolator<T> {
    /// Construct a linear interpolator.
    ///
    /// # Errors
    ///
    /// * `InterpolationError::InvalidInput` - mismatched lengths or non-finite data
    /// * `InterpolationError::InsufficientData` - fewer than 2 points
    /// * `InterpolationError::NonMonotonicData` - `xs` not strictly increasing
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        validate_grid(xs, ys, 2)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Grid abscissae.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Grid ordinates.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Number of grid points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false for a constructed interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        let (lo, hi) = self.domain();
        if !(x >= lo && x <= hi) {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: lo.to_f64().unwrap_or(f64::NAN),
                max: hi.to_f64().unwrap_or(f64::NAN),
            });
        }
        let i = segment_index(&self.xs, x);
        let w = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        Ok(self.ys[i] + w * (self.ys[i + 1] - self.ys[i]))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
