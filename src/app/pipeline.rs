//! Shared fit pipeline used by every subcommand.
//!
//! load (CSV or synthetic) -> least squares -> minimise -> search -> residuals
//!
//! The front-end in `app` only decides what to print.

use chrono::Utc;
use log::debug;

use crate::data::generate_linear_sample;
use crate::domain::{
    Candidate, DataSource, Dataset, DatasetStats, FitConfig, FitReport, FittedLine, ResidualRow,
    ResidualSummary,
};
use crate::error::AppError;
use crate::fit::{
    build_minimizer, distance, grid_search, minimize_with_report, ordinary_least_squares,
    random_search, residual_rows,
};
use crate::io::ingest::{RowError, load_dataset};

/// A dataset plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub label: String,
    pub dataset: Dataset,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
}

/// All computed outputs of a single `linfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub data: LoadedData,
    pub least_squares: FittedLine,
    pub minimized: FittedLine,
    pub grid: Vec<Candidate>,
    /// Residuals of the least-squares line.
    pub residuals: Vec<ResidualRow>,
    pub residual_summary: ResidualSummary,
}

impl RunOutput {
    /// Exportable report with the best `top_n` grid candidates.
    pub fn report(&self, top_n: usize) -> FitReport {
        FitReport {
            tool: env!("CARGO_PKG_NAME").to_string(),
            generated_at: Utc::now(),
            dataset: self.data.stats,
            least_squares: self.least_squares.clone(),
            minimized: self.minimized.clone(),
            residuals: self.residual_summary,
            top_grid: self.grid.iter().take(top_n).copied().collect(),
        }
    }
}

/// Load the configured dataset.
pub fn load_data(source: &DataSource) -> Result<LoadedData, AppError> {
    let (label, dataset, row_errors) = match source {
        DataSource::Csv(src) => {
            let ingest = load_dataset(src)?;
            let label = format!(
                "{} ({} of {} rows used)",
                src.path.display(),
                ingest.rows_used(),
                ingest.rows_read
            );
            (label, ingest.dataset, ingest.row_errors)
        }
        DataSource::Sample(spec) => {
            let label = format!(
                "synthetic sample (y = {} + {}x + N(0, {}), seed {})",
                spec.intercept, spec.slope, spec.noise_sd, spec.seed
            );
            (label, generate_linear_sample(spec)?, Vec::new())
        }
    };
    let stats = dataset
        .stats()
        .ok_or_else(|| AppError::empty_dataset("load data"))?;
    debug!("loaded {} points from {label}", stats.n_points);
    Ok(LoadedData {
        label,
        dataset,
        stats,
        row_errors,
    })
}

/// Execute the full fitting pipeline.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let data = load_data(&config.source)?;
    run_fit_on(config, data)
}

/// Execute the fitting pipeline on already loaded data.
pub fn run_fit_on(config: &FitConfig, data: LoadedData) -> Result<RunOutput, AppError> {
    let dataset = &data.dataset;

    let ols = ordinary_least_squares(dataset)?;
    let least_squares = FittedLine {
        method: "least squares".to_string(),
        params: ols,
        distance: distance(&ols, dataset)?,
        iterations: None,
    };

    let minimizer = build_minimizer(&config.minimizer);
    let outcome = minimize_with_report(dataset, &config.initial_guess.to_vec(), minimizer.as_ref())?;
    let minimized = FittedLine {
        method: minimizer.name().to_string(),
        params: outcome.params,
        distance: outcome.distance,
        iterations: Some(outcome.iterations),
    };

    let grid = grid_search(dataset, &config.grid_a0, &config.grid_a1)?;

    let residuals = residual_rows(&ols, dataset);
    let residual_summary = crate::report::residual_summary(&residuals)
        .ok_or_else(|| AppError::empty_dataset("summarise residuals"))?;

    Ok(RunOutput {
        data,
        least_squares,
        minimized,
        grid,
        residuals,
        residual_summary,
    })
}

/// Load the data and rank the configured grid.
pub fn run_grid(config: &FitConfig) -> Result<(LoadedData, Vec<Candidate>), AppError> {
    let data = load_data(&config.source)?;
    let ranked = grid_search(&data.dataset, &config.grid_a0, &config.grid_a1)?;
    Ok((data, ranked))
}

/// Load the data and rank `random_count` random candidates.
pub fn run_random(config: &FitConfig) -> Result<(LoadedData, Vec<Candidate>), AppError> {
    let data = load_data(&config.source)?;
    let (a0_lo, a0_hi) = config.random_a0;
    let (a1_lo, a1_hi) = config.random_a1;
    let ranked = random_search(
        &data.dataset,
        a0_lo..=a0_hi,
        a1_lo..=a1_hi,
        config.random_count,
        config.random_seed,
    )?;
    Ok((data, ranked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MinimizerSettings, ModelParams, ParamRange, SampleSpec};

    fn config() -> FitConfig {
        FitConfig {
            source: DataSource::Sample(SampleSpec::default()),
            grid_a0: ParamRange::new(-5.0, 20.0, 11),
            grid_a1: ParamRange::new(1.0, 3.0, 11),
            random_a0: (-20.0, 40.0),
            random_a1: (-5.0, 5.0),
            random_count: 50,
            random_seed: 3,
            minimizer: MinimizerSettings::default(),
            initial_guess: ModelParams::new(0.0, 0.0),
            top_n: 5,
            plot: false,
            plot_width: 40,
            plot_height: 10,
            hist_bins: 5,
            export_report: None,
            export_residuals: None,
        }
    }

    #[test]
    fn fit_pipeline_agrees_between_methods() {
        let out = run_fit(&config()).unwrap();
        assert_eq!(out.data.stats.n_points, 30);
        assert!(out.least_squares.params.max_abs_diff(&out.minimized.params) < 1e-3);
        assert!(out.least_squares.distance <= out.grid[0].distance + 1e-12);
        assert!(out.residual_summary.mean.abs() < 1e-9);

        let report = out.report(3);
        assert_eq!(report.top_grid.len(), 3);
        assert_eq!(report.tool, "linfit");
    }

    #[test]
    fn random_pipeline_respects_count() {
        let (data, ranked) = run_random(&config()).unwrap();
        assert_eq!(data.dataset.len(), 30);
        assert_eq!(ranked.len(), 50);
    }
}
