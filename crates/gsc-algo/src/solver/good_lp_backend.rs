//! Backends that go through the `good_lp` modelling layer.

use super::{EngineStatus, LpBackend, RawSolution, SolverConfig};
use crate::model::{Sense, TransportModel};
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, Solver, SolverModel,
    Variable,
};
use gsc_core::GscResult;

/// Clarabel interior-point engine via `good_lp`.
///
/// Pure Rust, so it is always available when compiled in. The objective and
/// iteration count come from Clarabel's own solution record.
#[cfg(feature = "solver-clarabel")]
pub struct ClarabelBackend;

#[cfg(feature = "solver-clarabel")]
impl LpBackend for ClarabelBackend {
    fn id(&self) -> &str {
        "clarabel"
    }

    fn solve(&self, model: &TransportModel, config: &SolverConfig) -> GscResult<RawSolution> {
        let (mut problem, xs) = formulate(model, good_lp::solvers::clarabel::clarabel);
        if let Some(limit) = config.timeout {
            problem.settings().time_limit(limit.as_secs_f64());
        }
        Ok(match problem.solve() {
            Ok(solution) => {
                let engine = solution.inner();
                RawSolution::optimal(values_of(&solution, &xs), engine.obj_val)
                    .with_iterations(engine.iterations as usize)
            }
            Err(e) => terminated(e),
        })
    }
}

/// HiGHS simplex/IPM engine via `good_lp` (native library).
///
/// `good_lp` does not surface HiGHS's objective, so only the values are
/// reported and the objective is recomputed during validation.
#[cfg(feature = "solver-highs")]
pub struct HighsBackend;

#[cfg(feature = "solver-highs")]
impl LpBackend for HighsBackend {
    fn id(&self) -> &str {
        "highs"
    }

    fn solve(&self, model: &TransportModel, config: &SolverConfig) -> GscResult<RawSolution> {
        use good_lp::WithTimeLimit;

        let (mut problem, xs) = formulate(model, good_lp::solvers::highs::highs);
        if let Some(limit) = config.timeout {
            problem = problem.with_time_limit(limit.as_secs_f64());
        }
        Ok(match problem.solve() {
            Ok(solution) => RawSolution::optimal_values(values_of(&solution, &xs)),
            Err(e) => terminated(e),
        })
    }
}

/// Translate the transport LP into an engine-specific `good_lp` problem.
fn formulate<S: Solver>(model: &TransportModel, solver: S) -> (S::Model, Vec<Variable>) {
    // === Variables ===
    let mut vars = variables!();
    let xs: Vec<Variable> = model
        .variables
        .iter()
        .map(|v| vars.add(variable().min(v.lower_bound)))
        .collect();

    // === Objective ===
    let mut objective = Expression::from(0.0);
    for (coeff, x) in model.objective.coefficients.iter().zip(&xs) {
        objective += *coeff * *x;
    }
    let mut problem = vars.minimise(objective).using(solver);

    // === Constraints ===
    for row in &model.constraints {
        let mut lhs = Expression::from(0.0);
        for &(k, coeff) in &row.terms {
            lhs += coeff * xs[k];
        }
        problem = match row.sense {
            Sense::Le => problem.with(constraint!(lhs <= row.rhs)),
            Sense::Ge => problem.with(constraint!(lhs >= row.rhs)),
        };
    }

    (problem, xs)
}

fn values_of(solution: &impl Solution, xs: &[Variable]) -> Vec<f64> {
    xs.iter().map(|x| solution.value(*x)).collect()
}

fn terminated(err: ResolutionError) -> RawSolution {
    let status = match err {
        ResolutionError::Infeasible => EngineStatus::Infeasible,
        ResolutionError::Unbounded => EngineStatus::Unbounded,
        other => EngineStatus::Error(other.to_string()),
    };
    RawSolution::terminated(status)
}
