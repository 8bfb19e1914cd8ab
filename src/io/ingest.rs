//! CSV ingest into a `Dataset`.
//!
//! Design goals:
//! - **Strict schema** for the two required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (row order is preserved)
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use csv::StringRecord;
use log::warn;

use crate::domain::{CsvSource, Dataset, Point};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the dataset plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedData {
    pub fn rows_used(&self) -> usize {
        self.dataset.len()
    }
}

/// Open `source.path` and load it.
pub fn load_dataset(source: &CsvSource) -> Result<IngestedData, AppError> {
    let file = File::open(&source.path).map_err(|e| {
        AppError::io(format!("Failed to open CSV '{}': {e}", source.path.display()))
    })?;
    read_dataset(file, source)
}

/// Load a dataset from any CSV reader.
pub fn read_dataset<R: Read>(input: R, source: &CsvSource) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_idx = column_index(&header_map, &source.x_column)?;
    let y_idx = column_index(&header_map, &source.y_column)?;

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let parsed = parse_cell(&record, x_idx, &source.x_column, source.log2_x).and_then(|x| {
            parse_cell(&record, y_idx, &source.y_column, source.log2_y).map(|y| Point { x, y })
        });
        match parsed {
            Ok(p) => points.push(p),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for e in &row_errors {
        warn!("skipping line {}: {}", e.line, e.message);
    }

    if points.is_empty() {
        return Err(AppError::empty_dataset("load CSV (no valid rows)"));
    }

    Ok(IngestedData {
        dataset: Dataset::new(points),
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn column_index(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(&normalize_header_name(name))
        .copied()
        .ok_or_else(|| AppError::invalid_input(format!("CSV is missing required column '{name}'.")))
}

fn parse_cell(record: &StringRecord, idx: usize, name: &str, log2: bool) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing value for '{name}'"))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("invalid number for '{name}': '{raw}'"))?;
    if !value.is_finite() {
        return Err(format!("non-finite value for '{name}': '{raw}'"));
    }
    if log2 {
        if value <= 0.0 {
            return Err(format!("cannot take log2 of '{name}' = {value}"));
        }
        return Ok(value.log2());
    }
    Ok(value)
}
