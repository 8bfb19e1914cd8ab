//! Formatted terminal output.

use crate::domain::{Candidate, DatasetStats, FittedLine, ResidualSummary};

/// Dataset, fitted lines and residual diagnostics.
pub fn format_run_summary(
    source_label: &str,
    stats: &DatasetStats,
    fits: &[FittedLine],
    residuals: &ResidualSummary,
) -> String {
    let mut out = String::new();

    out.push_str("=== linfit - linear model fit ===\n");
    out.push_str(&format!("Data: {source_label}\n"));
    out.push_str(&format!(
        "Points: n={} | x=[{:.3}, {:.3}] | y=[{:.3}, {:.3}]\n",
        stats.n_points, stats.x_min, stats.x_max, stats.y_min, stats.y_max
    ));

    out.push_str("\nFits:\n");
    for fit in fits {
        let iters = fit
            .iterations
            .map(|n| format!(" ({n} iterations)"))
            .unwrap_or_default();
        out.push_str(&format!(
            "- {:<16} a0={:>12.6} a1={:>12.6} distance={:.6}{iters}\n",
            fit.method, fit.params.intercept, fit.params.slope, fit.distance
        ));
    }

    out.push_str("\nResiduals (least squares):\n");
    out.push_str(&format!(
        "- n={} mean={:.3e} rmse={:.6} min={:.6} max={:.6}\n",
        residuals.n, residuals.mean, residuals.rmse, residuals.min, residuals.max
    ));
    out.push('\n');

    out
}

/// Ranked candidate table (top `top_n`).
pub fn format_candidates(title: &str, candidates: &[Candidate], top_n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{title} (best {} of {}):\n",
        top_n.min(candidates.len()),
        candidates.len()
    ));
    out.push_str(&format!("{:>5} {:>12} {:>12} {:>12}\n", "rank", "a0", "a1", "distance"));
    out.push_str(&format!("{:->5} {:->12} {:->12} {:->12}\n", "", "", "", ""));
    for (i, c) in candidates.iter().take(top_n).enumerate() {
        out.push_str(&format!(
            "{:>5} {:>12.4} {:>12.4} {:>12.6}\n",
            i + 1,
            c.params.intercept,
            c.params.slope,
            c.distance
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelParams;

    #[test]
    fn candidates_table_is_truncated_to_top_n() {
        let cands = vec![
            Candidate { params: ModelParams::new(2.0, 2.0), distance: 0.158 },
            Candidate { params: ModelParams::new(3.0, 1.5), distance: 0.7 },
            Candidate { params: ModelParams::new(0.0, 0.0), distance: 7.6 },
        ];
        let txt = format_candidates("Grid", &cands, 2);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Grid (best 2 of 3):");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "    1       2.0000       2.0000     0.158000");
    }

    #[test]
    fn summary_lists_every_fit() {
        let stats = DatasetStats { n_points: 4, x_min: 1.0, x_max: 4.0, y_min: 4.2, y_max: 10.2 };
        let fits = vec![
            FittedLine {
                method: "least squares".into(),
                params: ModelParams::new(2.15, 1.98),
                distance: 0.12,
                iterations: None,
            },
            FittedLine {
                method: "Nelder-Mead".into(),
                params: ModelParams::new(2.15, 1.98),
                distance: 0.12,
                iterations: Some(61),
            },
        ];
        let res = ResidualSummary { n: 4, mean: 0.0, rmse: 0.12, min: -0.19, max: 0.13 };
        let txt = format_run_summary("sample", &stats, &fits, &res);
        assert!(txt.contains("Data: sample"));
        assert!(txt.contains("- least squares "));
        assert!(txt.contains("(61 iterations)"));
    }
}
