//! Command-line parsing for the `linfit` tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting code. Every flag can also be supplied through a `LINFIT_*`
//! environment variable (a `.env` file is loaded first).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{CsvSource, DataSource, MinimizerKind, MinimizerSettings, SampleSpec};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "linfit", version, about = "Fit y = a0 + a1*x by grid search, minimisation and least squares")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, env = "LINFIT_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Least squares + minimiser + grid search, with summary, plots and exports.
    Fit(FitArgs),
    /// Print ranked grid candidates only.
    Grid(FitArgs),
    /// Print ranked random candidates only.
    Random(FitArgs),
    /// Write a synthetic linear dataset as CSV.
    Sample(SampleArgs),
}

/// Where the points come from: a CSV file, or the synthetic generator.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV file with a header row. Without it a synthetic sample is used.
    #[arg(short = 'f', long, env = "LINFIT_FILE")]
    pub file: Option<PathBuf>,

    /// Column holding x.
    #[arg(long = "x-col", default_value = "x", env = "LINFIT_X_COL")]
    pub x_col: String,

    /// Column holding y.
    #[arg(long = "y-col", default_value = "y", env = "LINFIT_Y_COL")]
    pub y_col: String,

    /// Fit against log2(x).
    #[arg(long)]
    pub log2_x: bool,

    /// Fit against log2(y).
    #[arg(long)]
    pub log2_y: bool,

    #[command(flatten)]
    pub sample: SampleFlags,
}

impl DataArgs {
    pub fn source(&self) -> DataSource {
        match &self.file {
            Some(path) => DataSource::Csv(CsvSource {
                path: path.clone(),
                x_column: self.x_col.clone(),
                y_column: self.y_col.clone(),
                log2_x: self.log2_x,
                log2_y: self.log2_y,
            }),
            None => DataSource::Sample(self.sample.spec()),
        }
    }
}

/// Synthetic dataset layout.
#[derive(Debug, Args, Clone)]
pub struct SampleFlags {
    /// Number of distinct x levels.
    #[arg(long, default_value_t = 10, env = "LINFIT_LEVELS")]
    pub levels: usize,

    /// Points per x level.
    #[arg(long, default_value_t = 3, env = "LINFIT_REPLICATES")]
    pub replicates: usize,

    /// Smallest x level.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub x_min: f64,

    /// Largest x level.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Intercept of the generating line.
    #[arg(long = "true-a0", default_value_t = 4.0, allow_negative_numbers = true)]
    pub true_a0: f64,

    /// Slope of the generating line.
    #[arg(long = "true-a1", default_value_t = 2.0, allow_negative_numbers = true)]
    pub true_a1: f64,

    /// Standard deviation of the Gaussian noise.
    #[arg(long, default_value_t = 2.0)]
    pub noise_sd: f64,

    /// Random seed for sample generation.
    #[arg(long, default_value_t = 42, env = "LINFIT_SEED")]
    pub seed: u64,
}

impl SampleFlags {
    pub fn spec(&self) -> SampleSpec {
        SampleSpec {
            levels: self.levels,
            replicates: self.replicates,
            x_min: self.x_min,
            x_max: self.x_max,
            intercept: self.true_a0,
            slope: self.true_a1,
            noise_sd: self.noise_sd,
            seed: self.seed,
        }
    }
}

/// Common options for fitting and searching.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Smallest a0 on the grid.
    #[arg(long, default_value_t = -5.0, allow_negative_numbers = true)]
    pub a0_min: f64,

    /// Largest a0 on the grid.
    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
    pub a0_max: f64,

    /// Grid steps along a0.
    #[arg(long, default_value_t = 25, env = "LINFIT_A0_STEPS")]
    pub a0_steps: usize,

    /// Smallest a1 on the grid.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub a1_min: f64,

    /// Largest a1 on the grid.
    #[arg(long, default_value_t = 3.0, allow_negative_numbers = true)]
    pub a1_max: f64,

    /// Grid steps along a1.
    #[arg(long, default_value_t = 25, env = "LINFIT_A1_STEPS")]
    pub a1_steps: usize,

    /// Random search bounds for a0, as MIN MAX.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [-20.0, 40.0], allow_negative_numbers = true)]
    pub random_a0: Vec<f64>,

    /// Random search bounds for a1, as MIN MAX.
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [-5.0, 5.0], allow_negative_numbers = true)]
    pub random_a1: Vec<f64>,

    /// Number of random candidates.
    #[arg(long, default_value_t = 250, env = "LINFIT_RANDOM_COUNT")]
    pub random_count: usize,

    /// Seed for random search.
    #[arg(long, default_value_t = 1, env = "LINFIT_RANDOM_SEED")]
    pub random_seed: u64,

    /// Minimiser used by `fit`.
    #[arg(long, value_enum, default_value_t = MinimizerKind::NelderMead, env = "LINFIT_MINIMIZER")]
    pub minimizer: MinimizerKind,

    /// Convergence tolerance.
    #[arg(long, default_value_t = 1e-10, env = "LINFIT_TOLERANCE")]
    pub tolerance: f64,

    /// Iteration cap for the minimiser.
    #[arg(long, default_value_t = 1000, env = "LINFIT_MAX_ITERS")]
    pub max_iters: u64,

    /// Starting a0 for the minimiser.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub a0_start: f64,

    /// Starting a1 for the minimiser.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub a1_start: f64,

    /// Show the top-N candidates.
    #[arg(long, default_value_t = 10, env = "LINFIT_TOP")]
    pub top: usize,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72, env = "LINFIT_WIDTH")]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20, env = "LINFIT_HEIGHT")]
    pub height: usize,

    /// Residual histogram bins.
    #[arg(long, default_value_t = 10)]
    pub bins: usize,

    /// Export the fit report to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export per-point residuals to CSV.
    #[arg(long = "export-residuals")]
    pub export_residuals: Option<PathBuf>,
}

impl FitArgs {
    pub fn minimizer_settings(&self) -> MinimizerSettings {
        MinimizerSettings {
            kind: self.minimizer,
            tolerance: self.tolerance,
            max_iters: self.max_iters,
        }
    }
}

/// Options for `linfit sample`.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub sample: SampleFlags,

    /// Output CSV path (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
