//! Evenly spaced parameter axes for grid search.

use crate::domain::ParamRange;
use crate::error::AppError;

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
///
/// A single step yields `[min]`.
pub fn lin_space(range: &ParamRange) -> Result<Vec<f64>, AppError> {
    let ParamRange { min, max, steps } = *range;
    if !(min.is_finite() && max.is_finite() && (max - min).is_finite() && max >= min) {
        return Err(AppError::invalid_input(format!(
            "Invalid parameter range: min={min}, max={max} (bounds and width must be finite, max>=min)."
        )));
    }
    if steps == 0 {
        return Err(AppError::invalid_input("Grid steps must be >= 1."));
    }
    if steps == 1 {
        return Ok(vec![min]);
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out: Vec<f64> = (0..steps).map(|i| min + step * i as f64).collect();
    // Pin the endpoint exactly; accumulated rounding can drift by an ulp.
    out[steps - 1] = max;
    Ok(out)
}
