//! Calibrate command implementation
//!
//! Fits Hull-White `(a, σ)` to a swaption basket over an initial curve using
//! the shortrate_optimiser crate.

use shortrate_models::models::ModelKind;
use shortrate_optimiser::{CalibrationConfig, HullWhiteCalibrator};
use tracing::{info, warn};

use crate::io::{self, ModelFile};
use crate::Result;

/// RMSE above which a fit is flagged.
const QUALITY_TOLERANCE: f64 = 1e-4;

/// Run the calibrate command
pub fn run(
    curve: &str,
    swaptions: &str,
    output: Option<&str>,
    config: &CalibrationConfig,
) -> Result<()> {
    info!("Starting calibration...");
    info!("  Curve: {}", curve);
    info!("  Swaptions: {}", swaptions);

    let points = io::read_curve(io::open_input(curve)?)?;
    let basket = io::read_swaptions(io::open_input(swaptions)?)?;
    info!("Loaded {} curve points and {} swaptions", points.len(), basket.len());

    let calibrator = HullWhiteCalibrator::new(config.clone());
    let (model, report) = calibrator.calibrate_with_report(&points, &basket)?;

    info!(
        "Calibrated a = {:.6}, sigma = {:.6} (rmse {:.3e}, {} iterations, {:?})",
        model.mean_reversion(),
        model.volatility(),
        report.rmse,
        report.iterations,
        report.duration
    );
    if !report.is_quality_acceptable(QUALITY_TOLERANCE) {
        warn!(
            "Pricing RMSE {:.3e} exceeds {:.0e} (largest error {:.3e})",
            report.rmse, QUALITY_TOLERANCE, report.max_error
        );
    }

    if let Some(path) = output {
        info!("Writing calibrated model to: {}", path);
    }
    io::write_json(
        output,
        &ModelFile {
            kind: ModelKind::HullWhiteOneFactor,
            model,
            report: Some(report),
        },
    )?;

    info!("Calibration complete");
    Ok(())
}
