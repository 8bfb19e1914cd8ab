//! Iterative fitting through an injected minimizer.
//!
//! The core only knows the [`Minimizer`] seam: "given an objective and a
//! starting point, return a locally optimal parameter vector or a failure
//! report". Convergence criteria belong to the implementation. A failure is
//! passed through as-is; there is no retry.

use log::debug;

use crate::domain::{Dataset, MinimizerKind, MinimizerSettings, ModelParams};
use crate::error::AppError;
use crate::fit::fitter::distance_raw;
use crate::fit::nelder_mead::NelderMead;
use crate::fit::newton::NewtonRaphson;

/// Scalar function of a parameter vector.
pub trait Objective {
    /// Expected parameter vector length.
    fn dimension(&self) -> usize;

    fn evaluate(&self, params: &[f64]) -> Result<f64, AppError>;
}

/// A located minimum.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub params: Vec<f64>,
    pub value: f64,
    pub iterations: u64,
}

/// Unconstrained local minimizer.
pub trait Minimizer {
    fn name(&self) -> &'static str;

    /// Minimise `objective` starting from `start`.
    ///
    /// Failure to converge is reported as `ErrorKind::NonConvergence` with the
    /// implementation's own description.
    fn minimize(&self, objective: &dyn Objective, start: &[f64]) -> Result<Minimum, AppError>;
}

/// The distance of a linear model against a fixed dataset, as an objective.
pub struct DistanceObjective<'a> {
    dataset: &'a Dataset,
}

impl<'a> DistanceObjective<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }
}

impl Objective for DistanceObjective<'_> {
    fn dimension(&self) -> usize {
        ModelParams::LEN
    }

    fn evaluate(&self, params: &[f64]) -> Result<f64, AppError> {
        distance_raw(params, self.dataset)
    }
}

/// Result of `minimize_with_report`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizeOutcome {
    pub params: ModelParams,
    pub distance: f64,
    pub iterations: u64,
}

/// Minimise the distance from `initial_guess` and return the parameters.
pub fn minimize(
    dataset: &Dataset,
    initial_guess: &[f64],
    minimizer: &dyn Minimizer,
) -> Result<ModelParams, AppError> {
    minimize_with_report(dataset, initial_guess, minimizer).map(|o| o.params)
}

/// Like [`minimize`], also returning the final distance and iteration count.
pub fn minimize_with_report(
    dataset: &Dataset,
    initial_guess: &[f64],
    minimizer: &dyn Minimizer,
) -> Result<MinimizeOutcome, AppError> {
    if initial_guess.len() != ModelParams::LEN {
        return Err(AppError::dimension_mismatch(ModelParams::LEN, initial_guess.len()));
    }
    if dataset.is_empty() {
        return Err(AppError::empty_dataset("minimize distance"));
    }

    let objective = DistanceObjective::new(dataset);
    let found = minimizer.minimize(&objective, initial_guess)?;
    let params = ModelParams::from_slice(&found.params)?;

    debug!(
        "{} converged after {} iterations: a0={:.6} a1={:.6} distance={:.6}",
        minimizer.name(),
        found.iterations,
        params.intercept,
        params.slope,
        found.value
    );

    Ok(MinimizeOutcome {
        params,
        distance: found.value,
        iterations: found.iterations,
    })
}

/// Build the minimizer selected by `settings`.
pub fn build_minimizer(settings: &MinimizerSettings) -> Box<dyn Minimizer> {
    match settings.kind {
        MinimizerKind::NelderMead => Box::new(NelderMead::new(settings.tolerance, settings.max_iters)),
        MinimizerKind::Newton => Box::new(NewtonRaphson::new(settings.tolerance, settings.max_iters)),
    }
}
