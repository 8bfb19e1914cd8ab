//! Scoring and closed-form fitting for the linear model.
//!
//! Given a dataset of `(x_i, y_i)` and a candidate `(a0, a1)`:
//! - residuals are `y_i - (a0 + a1 x_i)`
//! - the distance is the root mean square of the residuals
//!
//! `ordinary_least_squares` is the exact minimiser of that distance and serves
//! as the reference for the iterative route in `minimize`.

use nalgebra::{DMatrix, DVector};

use crate::domain::{Dataset, ModelParams, ResidualRow};
use crate::error::{AppError, ErrorKind};
use crate::math::{root_mean_square, solve_least_squares};
use crate::models::{fill_design_row, predict, predict_at};

/// `y_i - prediction_i` for every point.
pub fn residuals(params: &ModelParams, dataset: &Dataset) -> Vec<f64> {
    dataset
        .ys()
        .zip(predict(params, dataset))
        .map(|(y, y_fit)| y - y_fit)
        .collect()
}

/// Fitted value and residual per point.
pub fn residual_rows(params: &ModelParams, dataset: &Dataset) -> Vec<ResidualRow> {
    dataset
        .points()
        .iter()
        .map(|p| {
            let y_fit = predict_at(params, p.x);
            ResidualRow {
                x: p.x,
                y: p.y,
                y_fit,
                residual: p.y - y_fit,
            }
        })
        .collect()
}

/// Root mean square residual of `params` against `dataset`.
///
/// Fails with `EmptyDataset` when there are no points; NaN/Inf in the data
/// propagate into the score unchanged.
pub fn distance(params: &ModelParams, dataset: &Dataset) -> Result<f64, AppError> {
    root_mean_square(&residuals(params, dataset))
        .ok_or_else(|| AppError::empty_dataset("compute distance"))
}

/// Distance for a raw parameter vector, failing fast on a length mismatch.
pub fn distance_raw(params: &[f64], dataset: &Dataset) -> Result<f64, AppError> {
    let params = ModelParams::from_slice(params)?;
    distance(&params, dataset)
}

/// Exact least-squares line through the dataset.
///
/// Fewer than two distinct x values leave the slope unidentified; that case
/// fails with `SingularDesign` instead of returning an arbitrary line.
pub fn ordinary_least_squares(dataset: &Dataset) -> Result<ModelParams, AppError> {
    if dataset.is_empty() {
        return Err(AppError::empty_dataset("fit least squares"));
    }
    if !has_two_distinct_x(dataset) {
        return Err(AppError::new(
            ErrorKind::SingularDesign,
            "Least squares needs at least two distinct x values.",
        ));
    }

    let n = dataset.len();
    let mut x = DMatrix::<f64>::zeros(n, ModelParams::LEN);
    let mut y = DVector::<f64>::zeros(n);
    let mut row = [0.0; ModelParams::LEN];

    for (i, p) in dataset.points().iter().enumerate() {
        fill_design_row(p.x, &mut row);
        for (j, v) in row.iter().enumerate() {
            x[(i, j)] = *v;
        }
        y[i] = p.y;
    }

    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        AppError::new(
            ErrorKind::SingularDesign,
            "Least squares design matrix is rank deficient or produced a non-finite solution.",
        )
    })?;

    Ok(ModelParams::new(beta[0], beta[1]))
}

fn has_two_distinct_x(dataset: &Dataset) -> bool {
    let mut xs = dataset.xs();
    let Some(first) = xs.next() else {
        return false;
    };
    xs.any(|x| x != first)
}
