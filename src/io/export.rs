//! Result exports.
//!
//! - fit report as pretty JSON (`FitReport`)
//! - per-point residual table as CSV
//! - raw dataset as CSV (for `linfit sample`)

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Dataset, FitReport, ResidualRow};
use crate::error::AppError;

/// Write a fit report JSON file.
pub fn write_report_json(path: &Path, report: &FitReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::io(format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Read a fit report JSON file.
pub fn read_report_json(path: &Path) -> Result<FitReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open report JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::invalid_input(format!("Invalid report JSON: {e}")))
}

/// Write per-point residuals to a CSV file.
pub fn write_residuals_csv(path: &Path, rows: &[ResidualRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create residual CSV '{}': {e}", path.display())))?;
    write_residuals(file, rows)
}

/// Write per-point residuals as CSV to any writer.
pub fn write_residuals<W: Write>(out: W, rows: &[ResidualRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::io(format!("Failed to write residual CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush residual CSV: {e}")))?;
    Ok(())
}

/// Write a dataset as `x,y` CSV to any writer.
pub fn write_dataset<W: Write>(out: W, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for p in dataset.points() {
        writer
            .serialize(p)
            .map_err(|e| AppError::io(format!("Failed to write dataset CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush dataset CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Candidate, CsvSource, DatasetStats, FittedLine, ModelParams, ResidualSummary,
    };
    use crate::io::ingest::read_dataset;
    use chrono::Utc;
    use std::path::PathBuf;

    #[test]
    fn residual_csv_has_header_and_rows() {
        let rows = [ResidualRow {
            x: 1.0,
            y: 3.5,
            y_fit: 3.0,
            residual: 0.5,
        }];
        let mut buf = Vec::new();
        write_residuals(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "x,y,y_fit,residual\n1.0,3.5,3.0,0.5\n");
    }

    #[test]
    fn dataset_csv_reads_back() {
        let data = Dataset::from_pairs(&[(1.0, 2.5), (2.0, -1.25)]);
        let mut buf = Vec::new();
        write_dataset(&mut buf, &data).unwrap();

        let source = CsvSource {
            path: PathBuf::from("mem.csv"),
            x_column: "x".into(),
            y_column: "y".into(),
            log2_x: false,
            log2_y: false,
        };
        let back = read_dataset(buf.as_slice(), &source).unwrap();
        assert_eq!(back.dataset, data);
    }

    #[test]
    fn report_json_survives_a_file_trip() {
        let line = FittedLine {
            method: "ols".into(),
            params: ModelParams::new(2.15, 1.98),
            distance: 0.12,
            iterations: None,
        };
        let report = FitReport {
            tool: "linfit".into(),
            generated_at: Utc::now(),
            dataset: DatasetStats {
                n_points: 4,
                x_min: 1.0,
                x_max: 4.0,
                y_min: 4.2,
                y_max: 10.2,
            },
            least_squares: line.clone(),
            minimized: FittedLine {
                method: "Nelder-Mead".into(),
                iterations: Some(80),
                ..line
            },
            residuals: ResidualSummary {
                n: 4,
                mean: 0.0,
                rmse: 0.12,
                min: -0.19,
                max: 0.13,
            },
            top_grid: vec![Candidate {
                params: ModelParams::new(2.0, 2.0),
                distance: 0.158,
            }],
        };

        let path = std::env::temp_dir().join(format!("linfit-report-{}.json", std::process::id()));
        write_report_json(&path, &report).unwrap();
        let back = read_report_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back, report);
    }
}
