//! Reporting utilities: residual summaries and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;

use crate::domain::{ResidualRow, ResidualSummary};
use crate::math::{mean, root_mean_square};

/// Summarise residuals; `None` when there are no rows.
pub fn residual_summary(rows: &[ResidualRow]) -> Option<ResidualSummary> {
    let residuals: Vec<f64> = rows.iter().map(|r| r.residual).collect();
    let mean = mean(&residuals)?;
    let rmse = root_mean_square(&residuals)?;
    let min = residuals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = residuals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(ResidualSummary {
        n: residuals.len(),
        mean,
        rmse,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_basic() {
        let rows = [
            ResidualRow { x: 1.0, y: 2.0, y_fit: 1.0, residual: 1.0 },
            ResidualRow { x: 2.0, y: 1.0, y_fit: 4.0, residual: -3.0 },
        ];
        let s = residual_summary(&rows).unwrap();
        assert_eq!(s.n, 2);
        assert_eq!(s.mean, -1.0);
        assert_eq!((s.min, s.max), (-3.0, 1.0));
        assert!((s.rmse - 5f64.sqrt()).abs() < 1e-12);
        assert!(residual_summary(&[]).is_none());
    }
}
