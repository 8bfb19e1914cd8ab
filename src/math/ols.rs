//! Least squares solver.
//!
//! We solve small linear regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! The design matrix is tall (more rows than columns), so we go through SVD:
//! nalgebra's `QR::solve` is intended for square systems.
//!
//! Rank-deficient designs are rejected rather than given a minimum-norm
//! solution, since a line through data with a single distinct x is not
//! identified.

use nalgebra::{DMatrix, DVector};

/// Relative singular-value threshold below which a column is treated as dependent.
const RANK_TOL: f64 = 1e-12;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the design matrix is rank deficient or the solution is
/// not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() < x.ncols() || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let sv_max = svd.singular_values.max();
    if !(sv_max.is_finite() && sv_max > 0.0) {
        return None;
    }
    let eps = sv_max * RANK_TOL;
    if svd.rank(eps) < x.ncols() {
        return None;
    }

    let beta = svd.solve(y, eps).ok()?;
    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}
