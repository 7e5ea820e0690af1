//! Interpolator trait definition.

use crate::types::InterpolationError;
use num_traits::Float;

/// One-dimensional interpolation over a bounded domain.
pub trait Interpolator<T: Float> {
    /// Interpolated value at `x`.
    ///
    /// # Errors
    ///
    /// `InterpolationError::OutOfBounds` when `x` lies outside [`domain`](Self::domain).
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// Inclusive `(min, max)` range of valid query points.
    fn domain(&self) -> (T, T);

    /// Interpolated value with flat extrapolation beyond both ends.
    ///
    /// NaN queries return NaN.
    fn interpolate_flat(&self, x: T) -> T {
        let (lo, hi) = self.domain();
        let clamped = if x < lo {
            lo
        } else if x > hi {
            hi
        } else {
            x
        };
        self.interpolate(clamped).unwrap_or_else(|_| T::nan())
    }
}
