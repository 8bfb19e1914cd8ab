//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the read-only `Dataset` of `(x, y)` observations
//! - model parameters and scored candidates (`ModelParams`, `Candidate`)
//! - run configuration (`FitConfig`, `SampleSpec`, `MinimizerSettings`)

pub mod types;

pub use types::*;
