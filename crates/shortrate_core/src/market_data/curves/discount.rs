//! Validated discount curve built from observed zero-coupon prices.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use crate::math::interpolators::{CubicSplineInterpolator, Interpolator};
use crate::types::ValidationError;

/// One observed pillar: the price at time 0 of a zero-coupon bond paying 1 at
/// `maturity` (years).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YieldCurvePoint {
    /// Time to maturity in years.
    pub maturity: f64,
    /// Discount price in (0, 1].
    pub price: f64,
}

impl YieldCurvePoint {
    /// Create a pillar. Validation happens in [`DiscountCurve::new`].
    #[inline]
    pub fn new(maturity: f64, price: f64) -> Self {
        Self { maturity, price }
    }
}

/// Discount curve P(0, t) anchored at P(0, 0) = 1.
///
/// `ln P` is interpolated with a natural cubic spline through the anchor and
/// the pillars, so instantaneous forwards and their slopes are continuous.
/// Beyond the last pillar the instantaneous forward is held flat at its value
/// there.
///
/// Serialises as its list of pillars; deserialising re-runs validation.
///
/// # Example
///
/// ```
/// use shortrate_core::market_data::curves::{DiscountCurve, YieldCurve, YieldCurvePoint};
///
/// let curve = DiscountCurve::new(&[
///     YieldCurvePoint::new(1.0, 0.97),
///     YieldCurvePoint::new(5.0, 0.85),
/// ])
/// .unwrap();
///
/// assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
/// assert!((curve.discount_factor(5.0).unwrap() - 0.85).abs() < 1e-12);
/// assert!(curve.instantaneous_forward(20.0).unwrap() > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<YieldCurvePoint>", into = "Vec<YieldCurvePoint>")
)]
pub struct DiscountCurve {
    points: Vec<YieldCurvePoint>,
    log_spline: CubicSplineInterpolator<f64>,
    last_maturity: f64,
    last_log_discount: f64,
    /// ∂ ln P at the last pillar; minus the extrapolated forward.
    last_slope: f64,
}

impl DiscountCurve {
    /// Build a curve from pillars sorted by maturity.
    ///
    /// # Errors
    ///
    /// * `ValidationError::EmptyCurve` - no pillars
    /// * `ValidationError::InvalidMaturity` - maturity not positive and finite
    /// * `ValidationError::InvalidPrice` - price not in (0, 1]
    /// * `ValidationError::NonIncreasingMaturity` - maturities not strictly increasing
    /// * `ValidationError::NonMonotonicCurve` - a price above its predecessor
    pub fn new(points: &[YieldCurvePoint]) -> Result<Self, ValidationError> {
        validate_points(points)?;

        let mut times = Vec::with_capacity(points.len() + 1);
        let mut logs = Vec::with_capacity(points.len() + 1);
        times.push(0.0);
        logs.push(0.0);
        for p in points {
            times.push(p.maturity);
            logs.push(p.price.ln());
        }

        let log_spline = CubicSplineInterpolator::new(&times, &logs)
            .map_err(|e| ValidationError::invalid("curve", e.to_string()))?;
        let last_maturity = times[times.len() - 1];
        let last_log_discount = logs[logs.len() - 1];
        let last_slope = log_spline
            .derivative(last_maturity)
            .map_err(|e| ValidationError::invalid("curve", e.to_string()))?;

        Ok(Self {
            points: points.to_vec(),
            log_spline,
            last_maturity,
            last_log_discount,
            last_slope,
        })
    }

    /// Build a curve from parallel maturity and price slices.
    ///
    /// # Errors
    ///
    /// `ValidationError::InvalidParameter` on a length mismatch, otherwise as
    /// [`DiscountCurve::new`].
    pub fn from_maturities_and_prices(
        maturities: &[f64],
        prices: &[f64],
    ) -> Result<Self, ValidationError> {
        if maturities.len() != prices.len() {
            return Err(ValidationError::invalid(
                "prices",
                format!(
                    "{} maturities but {} prices",
                    maturities.len(),
                    prices.len()
                ),
            ));
        }
        let points: Vec<_> = maturities
            .iter()
            .zip(prices)
            .map(|(&t, &p)| YieldCurvePoint::new(t, p))
            .collect();
        Self::new(&points)
    }

    /// Curve with a constant continuously compounded rate, sampled at `maturities`.
    ///
    /// # Errors
    ///
    /// As [`DiscountCurve::new`]; a negative rate yields prices above 1.
    pub fn flat(rate: f64, maturities: &[f64]) -> Result<Self, ValidationError> {
        let points: Vec<_> = maturities
            .iter()
            .map(|&t| YieldCurvePoint::new(t, (-rate * t).exp()))
            .collect();
        Self::new(&points)
    }

    /// Pillars as supplied.
    #[inline]
    pub fn points(&self) -> &[YieldCurvePoint] {
        &self.points
    }

    /// Longest pillar maturity.
    #[inline]
    pub fn last_maturity(&self) -> f64 {
        self.last_maturity
    }

    /// f(0, 0), the short rate implied by the curve today.
    pub fn initial_short_rate(&self) -> f64 {
        self.log_spline
            .derivative(0.0)
            .map_or(-self.last_slope, |slope| -slope)
    }

    fn log_discount(&self, t: f64) -> Result<f64, MarketDataError> {
        check_time(t)?;
        if t > self.last_maturity {
            return Ok(self.last_log_discount + self.last_slope * (t - self.last_maturity));
        }
        Ok(self.log_spline.interpolate(t)?)
    }
}

impl YieldCurve<f64> for DiscountCurve {
    fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
        Ok(self.log_discount(t)?.exp())
    }

    fn instantaneous_forward(&self, t: f64) -> Result<f64, MarketDataError> {
        check_time(t)?;
        if t >= self.last_maturity {
            return Ok(-self.last_slope);
        }
        Ok(-self.log_spline.derivative(t)?)
    }

    fn forward_slope(&self, t: f64) -> Result<f64, MarketDataError> {
        check_time(t)?;
        if t >= self.last_maturity {
            return Ok(0.0);
        }
        Ok(-self.log_spline.second_derivative(t)?)
    }
}

impl TryFrom<Vec<YieldCurvePoint>> for DiscountCurve {
    type Error = ValidationError;

    fn try_from(points: Vec<YieldCurvePoint>) -> Result<Self, Self::Error> {
        Self::new(&points)
    }
}

impl From<DiscountCurve> for Vec<YieldCurvePoint> {
    fn from(curve: DiscountCurve) -> Self {
        curve.points
    }
}

#[inline]
fn check_time(t: f64) -> Result<(), MarketDataError> {
    if t >= 0.0 && t.is_finite() {
        Ok(())
    } else {
        Err(MarketDataError::InvalidMaturity { t })
    }
}

fn validate_points(points: &[YieldCurvePoint]) -> Result<(), ValidationError> {
    if points.is_empty() {
        return Err(ValidationError::EmptyCurve);
    }
    for (index, p) in points.iter().enumerate() {
        if !(p.maturity.is_finite() && p.maturity > 0.0) {
            return Err(ValidationError::InvalidMaturity {
                index,
                maturity: p.maturity,
            });
        }
        if !(p.price.is_finite() && p.price > 0.0 && p.price <= 1.0) {
            return Err(ValidationError::InvalidPrice {
                index,
                price: p.price,
            });
        }
        if index > 0 {
            let prev = &points[index - 1];
            if p.maturity <= prev.maturity {
                return Err(ValidationError::NonIncreasingMaturity { index });
            }
            if p.price > prev.price {
                return Err(ValidationError::NonMonotonicCurve { index });
            }
        }
    }
    Ok(())
}
