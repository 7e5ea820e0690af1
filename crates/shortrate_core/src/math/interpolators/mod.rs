//! Interpolation methods for numerical computation.
//!
//! ## Available Interpolators
//!
//! - [`LinearInterpolator`]: Piecewise linear interpolation on a strictly increasing grid
//! - [`CubicSplineInterpolator`]: Natural cubic spline with C² continuity and analytic derivatives
//!
//! ## Core Trait
//!
//! Both implement [`Interpolator`], which defines:
//! - `interpolate(x: T) -> Result<T, InterpolationError>`: value inside the domain
//! - `domain() -> (T, T)`: valid interpolation range
//! - `interpolate_flat(x: T) -> T`: value with flat extrapolation outside the domain
//!
//! ## Example
//!
//! ```
//! use shortrate_core::math::interpolators::{Interpolator, LinearInterpolator};
//!
//! let interp = LinearInterpolator::new(&[0.0_f64, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
//! assert!((interp.interpolate(1.5).unwrap() - 2.5).abs() < 1e-12);
//! assert_eq!(interp.interpolate_flat(10.0), 4.0);
//! ```

mod cubic_spline;
mod linear;
mod traits;

pub use cubic_spline::CubicSplineInterpolator;
pub use linear::LinearInterpolator;
pub use traits::Interpolator;

use crate::types::InterpolationError;
use num_traits::Float;

/// Check paired abscissae/ordinates: equal lengths, at least `need` points,
/// all finite, abscissae strictly increasing.
pub(crate) fn validate_grid<T: Float>(
    xs: &[T],
    ys: &[T],
    need: usize,
) -> Result<(), InterpolationError> {
    if xs.len() != ys.len() {
        return Err(InterpolationError::InvalidInput(format!(
            "xs and ys must have same length: got {} and {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < need {
        return Err(InterpolationError::InsufficientData {
            got: xs.len(),
            need,
        });
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(InterpolationError::InvalidInput(
            "data contains non-finite values".to_string(),
        ));
    }
    if let Some(index) = (1..xs.len()).find(|&i| xs[i] <= xs[i - 1]) {
        return Err(InterpolationError::NonMonotonicData { index });
    }
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i+1]]` containing `x`, clamped to `[0, n-2]`.
#[inline]
pub(crate) fn segment_index<T: Float>(xs: &[T], x: T) -> usize {
    let pos = xs.partition_point(|&xi| xi <= x);
    pos.clamp(1, xs.len() - 1) - 1
}
