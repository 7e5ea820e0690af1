//! Property tests for discount curve construction.

use proptest::prelude::*;
use shortrate_core::market_data::curves::{DiscountCurve, YieldCurve, YieldCurvePoint};
use shortrate_core::types::ValidationError;

/// Strictly increasing maturities with non-increasing prices in (0, 1].
fn monotone_curve() -> impl Strategy<Value = Vec<YieldCurvePoint>> {
    prop::collection::vec((0.05f64..3.0, 0.0f64..0.08), 1..12).prop_map(|steps| {
        let mut t = 0.0;
        let mut log_p = 0.0;
        steps
            .into_iter()
            .map(|(dt, fwd)| {
                t += dt;
                log_p -= fwd * dt;
                YieldCurvePoint::new(t, log_p.exp())
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn reprices_every_pillar(points in monotone_curve()) {
        let curve = DiscountCurve::new(&points).unwrap();
        for p in &points {
            let df = curve.discount_factor(p.maturity).unwrap();
            prop_assert!((df - p.price).abs() < 1e-12);
        }
    }

    #[test]
    fn discount_factors_are_positive_and_finite(
        points in monotone_curve(),
        t in 0.0f64..100.0,
    ) {
        let curve = DiscountCurve::new(&points).unwrap();
        let df = curve.discount_factor(t).unwrap();
        prop_assert!(df > 0.0 && df.is_finite());
        prop_assert!(curve.instantaneous_forward(t).unwrap().is_finite());
        prop_assert!(curve.forward_slope(t).unwrap().is_finite());
    }

    #[test]
    fn extrapolates_flat_forward_beyond_last_pillar(
        points in monotone_curve(),
        gap in 0.0f64..40.0,
        extra in 0.01f64..20.0,
    ) {
        let curve = DiscountCurve::new(&points).unwrap();
        let last = points[points.len() - 1];
        let f_last = curve.instantaneous_forward(last.maturity).unwrap();
        let t1 = last.maturity + gap;
        let t2 = t1 + extra;

        let p1 = curve.discount_factor(t1).unwrap();
        let p2 = curve.discount_factor(t2).unwrap();
        let expected = last.price * (-f_last * gap).exp();
        prop_assert!((p1 - expected).abs() <= 1e-10 * expected.max(1.0));
        prop_assert_eq!(curve.instantaneous_forward(t2).unwrap(), f_last);
        // Monotone in the direction of the last forward
        prop_assert!((p2 - p1) * f_last <= 1e-15);
    }

    #[test]
    fn rising_price_is_rejected(points in monotone_curve(), bump in 1e-6f64..0.01) {
        prop_assume!(points.len() >= 2);
        let mut points = points;
        let last = points.len() - 1;
        points[last].price = (points[last - 1].price + bump).min(1.0);
        prop_assume!(points[last].price > points[last - 1].price);
        prop_assert_eq!(
            DiscountCurve::new(&points),
            Err(ValidationError::NonMonotonicCurve { index: last })
        );
    }
}

#[test]
fn test_public_paths() {
    use shortrate_core::market_data::MarketDataError;
    use shortrate_core::math::interpolators::{
        CubicSplineInterpolator, Interpolator, LinearInterpolator,
    };
    use shortrate_core::math::solvers::{BoxConstraints, BrentSolver, NelderMeadSolver};
    use shortrate_core::types::InterpolationError;

    let root = BrentSolver::<f64>::with_defaults()
        .find_root(|x| x - 0.25, 0.0, 1.0)
        .unwrap();
    assert!((root - 0.25).abs() < 1e-12);

    let bounds = BoxConstraints::new(vec![-1.0], vec![1.0]).unwrap();
    let min = NelderMeadSolver::default()
        .minimise(|x| (x[0] - 0.5).powi(2), &[0.0], &bounds, None)
        .unwrap();
    assert!((min.x[0] - 0.5).abs() < 1e-6);

    let linear = LinearInterpolator::new(&[0.0_f64, 1.0], &[0.0, 1.0]).unwrap();
    assert_eq!(linear.interpolate(0.5).unwrap(), 0.5);
    let spline = CubicSplineInterpolator::new(&[0.0_f64, 1.0], &[0.0, 1.0]).unwrap();
    assert!((spline.interpolate(0.5).unwrap() - 0.5).abs() < 1e-15);
    assert!(matches!(
        linear.interpolate(2.0),
        Err(InterpolationError::OutOfBounds { .. })
    ));

    let curve = DiscountCurve::flat(0.02, &[1.0, 5.0]).unwrap();
    assert!(matches!(
        curve.discount_factor(-1.0),
        Err(MarketDataError::InvalidMaturity { .. })
    ));
}
