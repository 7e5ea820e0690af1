//! Natural cubic spline interpolation.

use super::{segment_index, validate_grid, Interpolator};
use crate::types::InterpolationError;
use num_traits::Float;

/// Polynomial `a + b·dx + c·dx² + d·dx³` on one segment, `dx = x - x_i`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Segment<T: Float> {
    a: T,
    b: T,
    c: T,
    d: T,
}

/// Natural cubic spline interpolator with C² continuity.
///
/// The second derivative vanishes at both ends. Two points give a straight
/// line. First and second derivatives are available in closed form, which is
/// what makes the spline suitable for forward-rate and drift calculations on
/// a log-discount curve.
///
/// # Example
///
/// ```
/// use shortrate_core::math::interpolators::{CubicSplineInterpolator, Interpolator};
///
/// let spline = CubicSplineInterpolator::new(&[0.0_f64, 1.0, 2.0, 3.0], &[0.0, 1.0, 4.0, 9.0]).unwrap();
/// assert!((spline.interpolate(2.0).unwrap() - 4.0).abs() < 1e-12);
/// // Natural boundary
/// assert!(spline.second_derivative(0.0).unwrap().abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicSplineInterpolator<T: Float> {
    xs: Vec<T>,
    segments: Vec<Segment<T>>,
}

impl<T: Float> CubicSplineInterpolator<T> {
    /// Construct a natural cubic spline through `(xs[i], ys[i])`.
    ///
    /// # Errors
    ///
    /// * `InterpolationError::InvalidInput` - mismatched lengths or non-finite data
    /// * `InterpolationError::InsufficientData` - fewer than 2 points
    /// * `InterpolationError::NonMonotonicData` - `xs` not strictly increasing
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        validate_grid(xs, ys, 2)?;
        let m = second_derivatives(xs, ys);

        let two = T::one() + T::one();
        let six = two * (two + T::one());
        let segments = (0..xs.len() - 1)
            .map(|i| {
                let h = xs[i + 1] - xs[i];
                Segment {
                    a: ys[i],
                    b: (ys[i + 1] - ys[i]) / h - h * (two * m[i] + m[i + 1]) / six,
                    c: m[i] / two,
                    d: (m[i + 1] - m[i]) / (six * h),
                }
            })
            .collect();

        Ok(Self {
            xs: xs.to_vec(),
            segments,
        })
    }

    /// Knot abscissae.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Number of knots.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false for a constructed spline.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// First derivative at `x`.
    pub fn derivative(&self, x: T) -> Result<T, InterpolationError> {
        let (seg, dx) = self.locate(x)?;
        let two = T::one() + T::one();
        let three = two + T::one();
        Ok(seg.b + dx * (two * seg.c + three * seg.d * dx))
    }

    /// Second derivative at `x`.
    pub fn second_derivative(&self, x: T) -> Result<T, InterpolationError> {
        let (seg, dx) = self.locate(x)?;
        let two = T::one() + T::one();
        let six = two * (two + T::one());
        Ok(two * seg.c + six * seg.d * dx)
    }

    fn locate(&self, x: T) -> Result<(&Segment<T>, T), InterpolationError> {
        let (lo, hi) = self.domain();
        if !(x >= lo && x <= hi) {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: lo.to_f64().unwrap_or(f64::NAN),
                max: hi.to_f64().unwrap_or(f64::NAN),
            });
        }
        let i = segment_index(&self.xs, x);
        Ok((&self.segments[i], x - self.xs[i]))
    }
}

impl<T: Float> Interpolator<T> for CubicSplineInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        let (seg, dx) = self.locate(x)?;
        Ok(seg.a + dx * (seg.b + dx * (seg.c + dx * seg.d)))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

/// Knot second derivatives of the natural spline (tridiagonal Thomas solve).
fn second_derivatives<T: Float>(xs: &[T], ys: &[T]) -> Vec<T> {
    let n = xs.len();
    let mut m = vec![T::zero(); n];
    if n < 3 {
        return m;
    }

    let two = T::one() + T::one();
    let six = two * (two + T::one());
    let h: Vec<T> = xs.windows(2).map(|w| w[1] - w[0]).collect();

    let interior = n - 2;
    let mut c_prime = vec![T::zero(); interior];
    let mut d_prime = vec![T::zero(); interior];

    for k in 0..interior {
        let i = k + 1;
        let diag = two * (h[i - 1] + h[i]);
        let rhs = six * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
        if k == 0 {
            c_prime[k] = h[i] / diag;
            d_prime[k] = rhs / diag;
        } else {
            let sub = h[i - 1];
            let denom = diag - sub * c_prime[k - 1];
            c_prime[k] = h[i] / denom;
            d_prime[k] = (rhs - sub * d_prime[k - 1]) / denom;
        }
    }

    m[interior] = d_prime[interior - 1];
    for k in (0..interior - 1).rev() {
        m[k + 1] = d_prime[k] - c_prime[k] * m[k + 2];
    }
    m
}
