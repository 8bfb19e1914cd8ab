//! Small summary statistics over residual vectors.

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Root mean square, or `None` for an empty slice.
pub fn root_mean_square(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let ss: f64 = values.iter().map(|v| v * v).sum();
    Some((ss / values.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slices_have_no_stats() {
        assert!(mean(&[]).is_none());
        assert!(root_mean_square(&[]).is_none());
    }

    #[test]
    fn rms_of_known_values() {
        let v = [3.0, -4.0];
        assert!((root_mean_square(&v).unwrap() - (12.5f64).sqrt()).abs() < 1e-12);
        assert!((mean(&v).unwrap() + 0.5).abs() < 1e-12);
    }
}
