//! Nelder-Mead simplex minimizer backed by `argmin`.
//!
//! Derivative-free, so it works directly on the RMS distance (which is not
//! differentiable where the fit is exact).

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead as SimplexSolver;
use log::debug;

use crate::error::AppError;
use crate::fit::minimize::{Minimizer, Minimum, Objective};

/// Nelder-Mead with a standard-deviation stopping rule on the simplex costs.
#[derive(Debug, Clone, Copy)]
pub struct NelderMead {
    /// Stop once the std. dev. of the simplex vertex costs falls below this.
    pub sd_tolerance: f64,
    pub max_iters: u64,
}

impl NelderMead {
    pub fn new(sd_tolerance: f64, max_iters: u64) -> Self {
        Self {
            sd_tolerance,
            max_iters,
        }
    }
}

struct Cost<'a> {
    objective: &'a dyn Objective,
}

impl CostFunction for Cost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        self.objective
            .evaluate(param)
            .map_err(|e| Error::msg(e.to_string()))
    }
}

/// Start point plus one vertex offset along each axis.
fn initial_simplex(start: &[f64]) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());
    for i in 0..start.len() {
        let mut vertex = start.to_vec();
        vertex[i] += 0.1 * start[i].abs().max(1.0);
        simplex.push(vertex);
    }
    simplex
}

impl Minimizer for NelderMead {
    fn name(&self) -> &'static str {
        "Nelder-Mead"
    }

    fn minimize(&self, objective: &dyn Objective, start: &[f64]) -> Result<Minimum, AppError> {
        if start.len() != objective.dimension() {
            return Err(AppError::dimension_mismatch(objective.dimension(), start.len()));
        }

        let solver = SimplexSolver::new(initial_simplex(start))
            .with_sd_tolerance(self.sd_tolerance)
            .map_err(|e| AppError::invalid_input(format!("Nelder-Mead tolerance: {e}")))?;

        let result = Executor::new(Cost { objective }, solver)
            .configure(|state| state.max_iters(self.max_iters))
            .run()
            .map_err(|e| AppError::non_convergence(format!("Nelder-Mead failed: {e}")))?;

        let state = result.state();
        debug!(
            "Nelder-Mead finished after {} iterations: {:?}",
            state.get_iter(),
            state.get_termination_status()
        );

        match state.get_termination_status() {
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
            | TerminationStatus::Terminated(TerminationReason::TargetCostReached) => {}
            status => {
                return Err(AppError::non_convergence(format!(
                    "Nelder-Mead stopped without converging after {} iterations: {status:?}",
                    state.get_iter()
                )));
            }
        }

        let params = state
            .get_best_param()
            .cloned()
            .ok_or_else(|| AppError::non_convergence("Nelder-Mead returned no best parameters."))?;

        Ok(Minimum {
            params,
            value: state.get_best_cost(),
            iterations: state.get_iter(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// `(p0 - 3)^2 + 10 (p1 + 1)^2`
    struct Bowl;

    impl Objective for Bowl {
        fn dimension(&self) -> usize {
            2
        }

        fn evaluate(&self, p: &[f64]) -> Result<f64, AppError> {
            Ok((p[0] - 3.0).powi(2) + 10.0 * (p[1] + 1.0).powi(2))
        }
    }

    #[test]
    fn finds_bowl_minimum() {
        let found = NelderMead::new(1e-14, 2_000).minimize(&Bowl, &[0.0, 0.0]).unwrap();
        assert!((found.params[0] - 3.0).abs() < 1e-4, "{:?}", found.params);
        assert!((found.params[1] + 1.0).abs() < 1e-4, "{:?}", found.params);
        assert!(found.value < 1e-8);
    }

    #[test]
    fn iteration_cap_is_non_convergence() {
        let err = NelderMead::new(1e-14, 2).minimize(&Bowl, &[50.0, 50.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonConvergence);
    }

    #[test]
    fn rejects_start_of_wrong_dimension() {
        let err = NelderMead::new(1e-8, 100).minimize(&Bowl, &[0.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    }

    #[test]
    fn simplex_has_one_vertex_per_axis_plus_start() {
        let s = initial_simplex(&[0.0, 20.0]);
        assert_eq!(s.len(), 3);
        assert_eq!(s[0], vec![0.0, 20.0]);
        assert_eq!(s[1], vec![0.1, 20.0]);
        assert_eq!(s[2], vec![0.0, 22.0]);
    }
}
