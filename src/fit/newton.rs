//! Damped Newton-Raphson minimizer.
//!
//! Each iteration:
//! - central finite-difference gradient and Hessian of the objective
//! - Newton direction from a Cholesky solve; if the Hessian is not positive
//!   definite, a growing diagonal shift is added until it is
//! - Armijo backtracking along that direction
//!
//! Stops when the gradient norm, the Newton step (relative to the parameter
//! scale) or the accepted decrease in the objective is below `tolerance`.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::fit::minimize::{Minimizer, Minimum, Objective};

/// Relative finite-difference step for gradients.
const GRAD_STEP: f64 = 1e-6;
/// Relative finite-difference step for Hessians.
const HESS_STEP: f64 = 1e-4;
/// Armijo sufficient-decrease constant.
const ARMIJO_C: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 60;

#[derive(Debug, Clone, Copy)]
pub struct NewtonRaphson {
    pub tolerance: f64,
    pub max_iters: u64,
}

impl NewtonRaphson {
    pub fn new(tolerance: f64, max_iters: u64) -> Self {
        Self {
            tolerance,
            max_iters,
        }
    }
}

impl Minimizer for NewtonRaphson {
    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }

    fn minimize(&self, objective: &dyn Objective, start: &[f64]) -> Result<Minimum, AppError> {
        if start.len() != objective.dimension() {
            return Err(AppError::dimension_mismatch(objective.dimension(), start.len()));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AppError::invalid_input("Newton-Raphson tolerance must be > 0."));
        }

        let mut x = DVector::from_column_slice(start);
        let mut fx = objective.evaluate(x.as_slice())?;
        if !fx.is_finite() {
            return Err(AppError::non_convergence(format!(
                "Newton-Raphson: objective is not finite at the starting point ({fx})."
            )));
        }

        for iter in 0..self.max_iters {
            let grad = gradient(objective, &x)?;
            if grad.norm() <= self.tolerance {
                return Ok(done(x, fx, iter));
            }

            let hess = hessian(objective, &x, fx)?;
            let dir = newton_direction(&hess, &grad).ok_or_else(|| {
                AppError::non_convergence(format!(
                    "Newton-Raphson: no usable Hessian at iteration {iter}."
                ))
            })?;

            if dir.norm() <= self.tolerance * (1.0 + x.norm()) {
                return Ok(done(x, fx, iter));
            }

            let slope = grad.dot(&dir);
            let mut t = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_BACKTRACKS {
                let candidate = &x + &dir * t;
                let fc = objective.evaluate(candidate.as_slice())?;
                if fc.is_finite() && fc <= fx + ARMIJO_C * t * slope {
                    accepted = Some((candidate, fc));
                    break;
                }
                t *= 0.5;
            }

            let Some((next, f_next)) = accepted else {
                // No sufficient decrease left above rounding noise.
                if dir.norm() <= self.tolerance.sqrt() * (1.0 + x.norm()) {
                    return Ok(done(x, fx, iter));
                }
                return Err(AppError::non_convergence(format!(
                    "Newton-Raphson: line search failed at iteration {iter} (f={fx:.6e}, |grad|={:.3e}).",
                    grad.norm()
                )));
            };

            debug!("newton iter {iter}: f={f_next:.6e} step={t:.3e}");
            let stalled = t == 1.0 && (fx - f_next).abs() <= self.tolerance * (1.0 + fx.abs());
            x = next;
            fx = f_next;
            if stalled {
                return Ok(done(x, fx, iter + 1));
            }
        }

        Err(AppError::non_convergence(format!(
            "Newton-Raphson did not converge within {} iterations (f={fx:.6e}).",
            self.max_iters
        )))
    }
}

fn done(x: DVector<f64>, value: f64, iterations: u64) -> Minimum {
    Minimum {
        params: x.iter().copied().collect(),
        value,
        iterations,
    }
}

fn step_size(rel: f64, v: f64) -> f64 {
    rel * v.abs().max(1.0)
}

fn eval_at(objective: &dyn Objective, x: &DVector<f64>) -> Result<f64, AppError> {
    objective.evaluate(x.as_slice())
}

fn gradient(objective: &dyn Objective, x: &DVector<f64>) -> Result<DVector<f64>, AppError> {
    let n = x.len();
    let mut g = DVector::zeros(n);
    for i in 0..n {
        let h = step_size(GRAD_STEP, x[i]);
        let mut xp = x.clone();
        let mut xm = x.clone();
        xp[i] += h;
        xm[i] -= h;
        g[i] = (eval_at(objective, &xp)? - eval_at(objective, &xm)?) / (2.0 * h);
    }
    Ok(g)
}

fn hessian(objective: &dyn Objective, x: &DVector<f64>, fx: f64) -> Result<DMatrix<f64>, AppError> {
    let n = x.len();
    let mut hess = DMatrix::zeros(n, n);
    for i in 0..n {
        let hi = step_size(HESS_STEP, x[i]);

        let mut xp = x.clone();
        let mut xm = x.clone();
        xp[i] += hi;
        xm[i] -= hi;
        hess[(i, i)] = (eval_at(objective, &xp)? - 2.0 * fx + eval_at(objective, &xm)?) / (hi * hi);

        for j in (i + 1)..n {
            let hj = step_size(HESS_STEP, x[j]);
            let mut pp = x.clone();
            let mut pm = x.clone();
            let mut mp = x.clone();
            let mut mm = x.clone();
            pp[i] += hi;
            pp[j] += hj;
            pm[i] += hi;
            pm[j] -= hj;
            mp[i] -= hi;
            mp[j] += hj;
            mm[i] -= hi;
            mm[j] -= hj;
            let v = (eval_at(objective, &pp)? - eval_at(objective, &pm)? - eval_at(objective, &mp)?
                + eval_at(objective, &mm)?)
                / (4.0 * hi * hj);
            hess[(i, j)] = v;
            hess[(j, i)] = v;
        }
    }
    Ok(hess)
}

/// Solve `(H + μI) d = -g`, raising `μ` until the shifted Hessian is
/// positive definite.
fn newton_direction(hess: &DMatrix<f64>, grad: &DVector<f64>) -> Option<DVector<f64>> {
    if hess.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let n = hess.nrows();
    let scale = hess.diagonal().iter().fold(0.0_f64, |m, v| m.max(v.abs())).max(1e-12);
    let mut shift = 0.0;
    for _ in 0..40 {
        let shifted = hess + DMatrix::<f64>::identity(n, n) * shift;
        if let Some(chol) = shifted.cholesky() {
            let dir = chol.solve(&(-grad));
            if dir.iter().all(|v| v.is_finite()) {
                return Some(dir);
            }
        }
        shift = if shift == 0.0 { scale * 1e-8 } else { shift * 10.0 };
    }
    None
}
