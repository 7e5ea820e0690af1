//! File formats read and written by the commands.
//!
//! - Curve CSV: `Maturity,Price`
//! - Swaption CSV: `swap_rate,expiry,tenor_start,tenor_end,fixed_frequency,market_price[,option_type]`
//! - Shock CSV: no header, one row per time step, one column per path
//! - Path CSV: `Time,Path_0,Path_1,...`, one row per grid time
//! - Model JSON: [`ModelFile`]

use serde::{Deserialize, Serialize};
use shortrate_core::market_data::curves::YieldCurvePoint;
use shortrate_models::instruments::rates::{MarketSwaption, SwaptionQuote};
use shortrate_models::models::rates::CalibratedModel;
use shortrate_models::models::ModelKind;
use shortrate_optimiser::CalibrationReport;
use shortrate_simulation::{ShockMatrix, SimulationResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::{CliError, Result};

/// Calibrated model as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    /// Registry kind of the stored model.
    pub kind: ModelKind,
    /// Parameters and curve; θ is refitted when the file is read.
    pub model: CalibratedModel,
    /// Per-instrument fit, when written by `calibrate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<CalibrationReport>,
}

#[derive(Debug, Deserialize)]
struct CurveRecord {
    #[serde(alias = "Maturity")]
    maturity: f64,
    #[serde(alias = "Price")]
    price: f64,
}

/// Open `path` for reading, reporting a missing file as [`CliError::FileNotFound`].
pub fn open_input(path: &str) -> Result<File> {
    if !Path::new(path).exists() {
        return Err(CliError::FileNotFound(path.to_string()));
    }
    Ok(File::open(path)?)
}

fn csv_reader<R: Read>(reader: R, has_headers: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Read curve pillars. Validation is left to the curve constructor.
pub fn read_curve<R: Read>(reader: R) -> Result<Vec<YieldCurvePoint>> {
    let mut rdr = csv_reader(reader, true);
    let mut points = Vec::new();
    for record in rdr.deserialize() {
        let record: CurveRecord = record?;
        points.push(YieldCurvePoint::new(record.maturity, record.price));
    }
    Ok(points)
}

/// Read and validate swaption quotes.
pub fn read_swaptions<R: Read>(reader: R) -> Result<Vec<MarketSwaption>> {
    let mut rdr = csv_reader(reader, true);
    let mut swaptions = Vec::new();
    for (row, record) in rdr.deserialize().enumerate() {
        let quote: SwaptionQuote = record?;
        let swaption = MarketSwaption::try_from(quote).map_err(|e| {
            CliError::InvalidArgument(format!("swaption row {}: {}", row + 1, e))
        })?;
        swaptions.push(swaption);
    }
    Ok(swaptions)
}

/// Read a shock matrix: rows are time steps, columns are paths.
pub fn read_shocks<R: Read>(reader: R) -> Result<ShockMatrix> {
    let mut rdr = csv_reader(reader, false);
    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        let row: Vec<f64> = record?;
        rows.push(row);
    }
    Ok(ShockMatrix::from_rows(rows)?)
}

/// Write simulated paths, one row per grid time.
pub fn write_paths<W: Write>(writer: W, result: &SimulationResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let header = std::iter::once("Time".to_string())
        .chain((0..result.num_paths()).map(|j| format!("Path_{}", j)));
    wtr.write_record(header)?;

    for (step, time) in result.time_grid().iter().enumerate() {
        let rates = result.rates_at(step).unwrap_or_default();
        let row = std::iter::once(time.to_string()).chain(rates.iter().map(f64::to_string));
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Read a model file.
pub fn read_model(path: &str) -> Result<ModelFile> {
    let file = open_input(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Write `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    match path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut out, value)?;
            out.flush()?;
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shortrate_core::market_data::curves::DiscountCurve;
    use shortrate_models::instruments::rates::SwaptionType;
    use shortrate_models::models::rates::{FitterConfig, HullWhiteParams};
    use shortrate_simulation::{PathSimulator, ScenarioDefinition, SimulationConfig};

    #[test]
    fn test_read_curve() {
        let csv = "Maturity,Price\n1.0, 0.97\n5.0,0.85\n";
        let points = read_curve(csv.as_bytes()).unwrap();
        assert_eq!(
            points,
            vec![
                YieldCurvePoint::new(1.0, 0.97),
                YieldCurvePoint::new(5.0, 0.85)
            ]
        );
    }

    #[test]
    fn test_read_curve_rejects_text() {
        let csv = "Maturity,Price\n1.0,abc\n";
        assert!(matches!(read_curve(csv.as_bytes()), Err(CliError::Csv(_))));
    }

    #[test]
    fn test_read_swaptions() {
        let csv = "swap_rate,expiry,tenor_start,tenor_end,fixed_frequency,market_price,option_type\n\
                   0.03,1,1,3,0.5,0.004,payer\n\
                   0.025,2,2,7,1,0.011,receiver\n";
        let swaptions = read_swaptions(csv.as_bytes()).unwrap();
        assert_eq!(swaptions.len(), 2);
        assert_eq!(swaptions[0].kind(), SwaptionType::Payer);
        assert_eq!(swaptions[1].kind(), SwaptionType::Receiver);
        assert_relative_eq!(swaptions[1].fixed_payment_frequency(), 1.0);
        assert_relative_eq!(swaptions[1].market_price(), 0.011);
    }

    #[test]
    fn test_read_swaptions_defaults_to_payer() {
        let csv = "swap_rate,expiry,tenor_start,tenor_end,fixed_frequency,market_price\n\
                   0.03,1,1,3,0.5,0.004\n";
        let swaptions = read_swaptions(csv.as_bytes()).unwrap();
        assert_eq!(swaptions[0].kind(), SwaptionType::Payer);
    }

    #[test]
    fn test_read_swaptions_reports_row() {
        // tenor_end before tenor_start on the second row
        let csv = "swap_rate,expiry,tenor_start,tenor_end,fixed_frequency,market_price\n\
                   0.03,1,1,3,0.5,0.004\n\
                   0.03,1,1,0.5,0.5,0.004\n";
        match read_swaptions(csv.as_bytes()) {
            Err(CliError::InvalidArgument(msg)) => assert!(msg.starts_with("swaption row 2")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_shocks() {
        let csv = "0.1,-0.2,0.3\n1.5,0.0,-1.0\n";
        let shocks = read_shocks(csv.as_bytes()).unwrap();
        assert_eq!(shocks.rows(), 2);
        assert_eq!(shocks.cols(), 3);
        assert_eq!(shocks.get(1, 2), Some(-1.0));
    }

    #[test]
    fn test_read_shocks_rejects_ragged_rows() {
        let csv = "0.1,0.2\n0.3\n";
        assert!(read_shocks(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_write_paths_layout() {
        let curve = DiscountCurve::flat(0.03, &[1.0, 5.0]).unwrap();
        let params = HullWhiteParams::new(0.1, 0.01).unwrap();
        let model = CalibratedModel::fit(params, curve, &FitterConfig::default(), 0.0).unwrap();
        let scenario = ScenarioDefinition::new(2, 1.0, 0.5).unwrap();
        let result = PathSimulator::new(SimulationConfig::default().with_seed(3))
            .simulate(&model, &scenario, None)
            .unwrap();

        let mut buffer = Vec::new();
        write_paths(&mut buffer, &result).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Time,Path_0,Path_1");
        assert!(lines[1].starts_with("0,"));
        assert!(lines[3].starts_with("1,"));
        let first: Vec<f64> = lines[1]
            .split(',')
            .skip(1)
            .map(|v| v.parse().unwrap())
            .collect();
        for r in first {
            assert_relative_eq!(r, 0.03, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_model_file_round_trip() {
        let curve = DiscountCurve::flat(0.02, &[1.0, 10.0]).unwrap();
        let params = HullWhiteParams::new(0.05, 0.008).unwrap();
        let model = CalibratedModel::fit(
            params,
            curve,
            &FitterConfig::default().with_step(0.5),
            1e-9,
        )
        .unwrap();
        let file = ModelFile {
            kind: ModelKind::HullWhiteOneFactor,
            model,
            report: None,
        };

        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"hull_white_one_factor\""));
        assert!(!json.contains("report"));
        let back: ModelFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, file.kind);
        assert_eq!(back.model, file.model);
    }

    #[test]
    fn test_model_file_with_drift_table_is_rejected() {
        let curve = DiscountCurve::flat(0.02, &[1.0, 10.0]).unwrap();
        let params = HullWhiteParams::new(0.05, 0.008).unwrap();
        let model = CalibratedModel::fit(params, curve, &FitterConfig::default(), 0.0).unwrap();
        let file = ModelFile {
            kind: ModelKind::HullWhiteOneFactor,
            model,
            report: None,
        };
        let mut value = serde_json::to_value(&file).unwrap();
        value["model"]["theta"] = serde_json::json!({ "table": { "xs": [], "ys": [] } });
        let text = value.to_string();
        assert!(matches!(
            serde_json::from_str::<ModelFile>(&text).map_err(CliError::from),
            Err(CliError::Json(_))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            open_input("/nonexistent/curve.csv"),
            Err(CliError::FileNotFound(_))
        ));
    }
}
