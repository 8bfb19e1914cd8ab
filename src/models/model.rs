//! Evaluation of the straight-line model `y = a0 + a1 * x`.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given x (for OLS)
//! - predict y given parameters (for residuals, distances and plots)

use crate::domain::{Dataset, ModelParams};
use crate::error::AppError;

/// Fill a design row `[1, x]`.
///
/// # Panics
/// Panics if `out` has fewer than `ModelParams::LEN` elements.
pub fn fill_design_row(x: f64, out: &mut [f64]) {
    out[0] = 1.0;
    out[1] = x;
}

/// Predict `y` at a single `x`.
pub fn predict_at(params: &ModelParams, x: f64) -> f64 {
    params.intercept + params.slope * x
}

/// Predict `y_i` for every point of the dataset.
pub fn predict(params: &ModelParams, dataset: &Dataset) -> Vec<f64> {
    dataset.xs().map(|x| predict_at(params, x)).collect()
}

/// Predict from a raw parameter vector, failing fast on a length mismatch.
pub fn predict_raw(params: &[f64], dataset: &Dataset) -> Result<Vec<f64>, AppError> {
    let params = ModelParams::from_slice(params)?;
    Ok(predict(&params, dataset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn predict_follows_line() {
        let data = Dataset::from_pairs(&[(0.0, 0.0), (1.0, 0.0), (2.5, 0.0)]);
        let y = predict(&ModelParams::new(1.0, 2.0), &data);
        assert_eq!(y, vec![1.0, 3.0, 6.0]);
    }

    #[test]
    fn predict_raw_rejects_mismatched_vector() {
        let data = Dataset::from_pairs(&[(1.0, 2.0)]);
        let err = predict_raw(&[], &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        let err = predict_raw(&[1.0, 2.0, 3.0], &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    }

    #[test]
    fn predict_on_empty_dataset_is_empty() {
        assert!(predict(&ModelParams::new(1.0, 1.0), &Dataset::default()).is_empty());
    }
}
