//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and searching
//! - exported to JSON/CSV
//! - handed to the terminal plotting code

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// An ordered, read-only sequence of observations.
///
/// Fields are private: once built, a dataset is never mutated. Every fitting
/// operation takes it by reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    points: Vec<Point>,
}

impl Dataset {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self {
            points: pairs.iter().map(|&(x, y)| Point { x, y }).collect(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }

    /// Summary stats, or `None` for an empty dataset.
    pub fn stats(&self) -> Option<DatasetStats> {
        let first = self.points.first()?;
        let mut stats = DatasetStats {
            n_points: self.points.len(),
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        for p in &self.points[1..] {
            stats.x_min = stats.x_min.min(p.x);
            stats.x_max = stats.x_max.max(p.x);
            stats.y_min = stats.y_min.min(p.y);
            stats.y_max = stats.y_max.max(p.y);
        }
        Some(stats)
    }
}

/// Summary stats about a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Parameters of the line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub intercept: f64,
    pub slope: f64,
}

impl ModelParams {
    /// Number of parameters in the linear model family.
    pub const LEN: usize = 2;

    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    /// Build from a raw parameter vector `[a0, a1]`.
    pub fn from_slice(values: &[f64]) -> Result<Self, AppError> {
        match values {
            [a0, a1] => Ok(Self::new(*a0, *a1)),
            _ => Err(AppError::dimension_mismatch(Self::LEN, values.len())),
        }
    }

    pub fn to_vec(self) -> Vec<f64> {
        vec![self.intercept, self.slope]
    }

    /// Largest absolute component-wise difference.
    pub fn max_abs_diff(&self, other: &ModelParams) -> f64 {
        (self.intercept - other.intercept)
            .abs()
            .max((self.slope - other.slope).abs())
    }
}

/// A scored candidate model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub params: ModelParams,
    pub distance: f64,
}

/// Per-point fitted value and residual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualRow {
    pub x: f64,
    pub y: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// Evenly spaced sampling of one parameter axis: `steps` values from `min`
/// to `max` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub steps: usize,
}

impl ParamRange {
    pub fn new(min: f64, max: f64, steps: usize) -> Self {
        Self { min, max, steps }
    }
}

/// Which minimizer backs `minimize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MinimizerKind {
    /// Derivative-free simplex search.
    NelderMead,
    /// Damped Newton-Raphson with finite-difference derivatives.
    Newton,
}

/// Convergence settings shared by the shipped minimizers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimizerSettings {
    pub kind: MinimizerKind,
    pub tolerance: f64,
    pub max_iters: u64,
}

impl Default for MinimizerSettings {
    fn default() -> Self {
        Self {
            kind: MinimizerKind::NelderMead,
            tolerance: 1e-10,
            max_iters: 1_000,
        }
    }
}

/// Synthetic linear dataset layout.
///
/// `levels` evenly spaced x values between `x_min` and `x_max`, each repeated
/// `replicates` times, with `y = intercept + slope * x + N(0, noise_sd)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSpec {
    pub levels: usize,
    pub replicates: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub intercept: f64,
    pub slope: f64,
    pub noise_sd: f64,
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            levels: 10,
            replicates: 3,
            x_min: 1.0,
            x_max: 10.0,
            intercept: 4.0,
            slope: 2.0,
            noise_sd: 2.0,
            seed: 42,
        }
    }
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Csv(CsvSource),
    Sample(SampleSpec),
}

/// CSV ingest settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvSource {
    pub path: PathBuf,
    pub x_column: String,
    pub y_column: String,
    /// Apply `log2` to x before fitting.
    pub log2_x: bool,
    /// Apply `log2` to y before fitting.
    pub log2_y: bool,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub source: DataSource,

    pub grid_a0: ParamRange,
    pub grid_a1: ParamRange,

    /// Random search bounds for a0 and a1.
    pub random_a0: (f64, f64),
    pub random_a1: (f64, f64),
    pub random_count: usize,
    pub random_seed: u64,

    pub minimizer: MinimizerSettings,
    pub initial_guess: ModelParams,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub hist_bins: usize,

    pub export_report: Option<PathBuf>,
    pub export_residuals: Option<PathBuf>,
}

/// Residual diagnostics for one fitted line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualSummary {
    pub n: usize,
    pub mean: f64,
    pub rmse: f64,
    pub min: f64,
    pub max: f64,
}

/// One fitted line plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedLine {
    pub method: String,
    pub params: ModelParams,
    pub distance: f64,
    /// Iterations reported by the minimizer (absent for closed-form fits).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,
}

/// A saved fit report (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub dataset: DatasetStats,
    pub least_squares: FittedLine,
    pub minimized: FittedLine,
    pub residuals: ResidualSummary,
    pub top_grid: Vec<Candidate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn params_from_slice_rejects_wrong_length() {
        let err = ModelParams::from_slice(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        let err = ModelParams::from_slice(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);

        let p = ModelParams::from_slice(&[1.5, -2.0]).unwrap();
        assert_eq!(p, ModelParams::new(1.5, -2.0));
    }

    #[test]
    fn stats_cover_all_points() {
        let data = Dataset::from_pairs(&[(2.0, 5.0), (-1.0, 7.0), (4.0, -3.0)]);
        let s = data.stats().unwrap();
        assert_eq!(s.n_points, 3);
        assert_eq!((s.x_min, s.x_max), (-1.0, 4.0));
        assert_eq!((s.y_min, s.y_max), (-3.0, 7.0));
        assert!(Dataset::default().stats().is_none());
    }
}
