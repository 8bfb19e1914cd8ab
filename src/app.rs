//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - runs the fit pipeline
//! - prints reports/plots and writes optional exports

use std::fs::File;
use std::io::Write;

use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Command, FitArgs, SampleArgs};
use crate::domain::{FitConfig, ModelParams, ParamRange};
use crate::error::AppError;
use crate::io::export::{write_dataset, write_report_json, write_residuals_csv};
use crate::plot::{render_fit_plot, render_residual_histogram, render_residual_plot};
use crate::report::{format_candidates, format_run_summary};

pub mod pipeline;

/// Entry point for the `linfit` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Fit(args) => handle_fit(&args),
        Command::Grid(args) => handle_grid(&args),
        Command::Random(args) => handle_random(&args),
        Command::Sample(args) => handle_sample(&args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .init();
}

fn handle_fit(args: &FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(args)?;
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        format_run_summary(
            &run.data.label,
            &run.data.stats,
            &[run.least_squares.clone(), run.minimized.clone()],
            &run.residual_summary,
        )
    );
    println!("{}", format_candidates("Grid candidates", &run.grid, config.top_n));

    if config.plot {
        let others: Vec<ModelParams> = run.grid.iter().take(config.top_n).map(|c| c.params).collect();
        println!(
            "{}",
            render_fit_plot(
                &run.residuals,
                &run.least_squares.params,
                &others,
                config.plot_width,
                config.plot_height,
            )
        );
        println!(
            "{}",
            render_residual_plot(&run.residuals, config.plot_width, config.plot_height)
        );
        let residuals: Vec<f64> = run.residuals.iter().map(|r| r.residual).collect();
        println!(
            "{}",
            render_residual_histogram(&residuals, config.hist_bins, config.plot_width / 2)
        );
    }

    if let Some(path) = &config.export_report {
        write_report_json(path, &run.report(config.top_n))?;
        info!("wrote report to {}", path.display());
    }
    if let Some(path) = &config.export_residuals {
        write_residuals_csv(path, &run.residuals)?;
        info!("wrote residuals to {}", path.display());
    }

    Ok(())
}

fn handle_grid(args: &FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(args)?;
    let (data, ranked) = pipeline::run_grid(&config)?;
    println!("Data: {}", data.label);
    println!("{}", format_candidates("Grid candidates", &ranked, config.top_n));
    Ok(())
}

fn handle_random(args: &FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(args)?;
    let (data, ranked) = pipeline::run_random(&config)?;
    println!("Data: {}", data.label);
    println!("{}", format_candidates("Random candidates", &ranked, config.top_n));
    Ok(())
}

fn handle_sample(args: &SampleArgs) -> Result<(), AppError> {
    let dataset = crate::data::generate_linear_sample(&args.sample.spec())?;
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", path.display())))?;
            write_dataset(file, &dataset)?;
            info!("wrote {} points to {}", dataset.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_dataset(&mut lock, &dataset)?;
            lock.flush()
                .map_err(|e| AppError::io(format!("Failed to flush stdout: {e}")))?;
        }
    }
    Ok(())
}

/// Fold CLI flags into a validated `FitConfig`.
pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    if !(args.tolerance.is_finite() && args.tolerance > 0.0) {
        return Err(AppError::invalid_input(format!(
            "Tolerance must be finite and > 0 (got {}).",
            args.tolerance
        )));
    }
    if args.max_iters == 0 {
        return Err(AppError::invalid_input("Max iterations must be > 0."));
    }
    if args.bins == 0 {
        return Err(AppError::invalid_input("Histogram bins must be > 0."));
    }

    Ok(FitConfig {
        source: args.data.source(),
        grid_a0: ParamRange::new(args.a0_min, args.a0_max, args.a0_steps),
        grid_a1: ParamRange::new(args.a1_min, args.a1_max, args.a1_steps),
        random_a0: bounds("random a0", &args.random_a0)?,
        random_a1: bounds("random a1", &args.random_a1)?,
        random_count: args.random_count,
        random_seed: args.random_seed,
        minimizer: args.minimizer_settings(),
        initial_guess: ModelParams::new(args.a0_start, args.a1_start),
        top_n: args.top,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        hist_bins: args.bins,
        export_report: args.export.clone(),
        export_residuals: args.export_residuals.clone(),
    })
}

fn bounds(name: &str, values: &[f64]) -> Result<(f64, f64), AppError> {
    match values {
        [lo, hi] => Ok((*lo, *hi)),
        _ => Err(AppError::invalid_input(format!(
            "{name} needs exactly two values (MIN MAX), got {}.",
            values.len()
        ))),
    }
}
