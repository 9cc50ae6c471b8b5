//! Clarabel called directly on the sparse conic form, bypassing `good_lp`.
//!
//! Clarabel solves
//!
//! ```text
//! minimize    (1/2)x'Px + q'x
//! subject to  Ax + s = b,   s ∈ K
//! ```
//!
//! The transport LP maps onto it with `P = 0`, `q = cost` and a single
//! nonnegative cone `K = R₊^m` whose rows are the `≤` form of every capacity
//! and demand row, followed by `-x ≤ 0` for the flow bounds.

use super::{EngineStatus, LpBackend, RawSolution, SolverConfig};
use crate::model::{Sense, TransportModel};
use clarabel::{
    algebra::CscMatrix,
    solver::{DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT},
};
use gsc_core::GscResult;

pub struct ClarabelNativeBackend;

impl LpBackend for ClarabelNativeBackend {
    fn id(&self) -> &str {
        "clarabel-native"
    }

    fn solve(&self, model: &TransportModel, config: &SolverConfig) -> GscResult<RawSolution> {
        let n_var = model.num_variables();

        // Entries accumulated per column as (row, value).
        let mut cols: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n_var];
        let mut rhs = Vec::with_capacity(model.num_constraints() + n_var);

        for row in &model.constraints {
            let r = rhs.len();
            let sign = match row.sense {
                Sense::Le => 1.0,
                Sense::Ge => -1.0,
            };
            for &(k, coeff) in &row.terms {
                cols[k].push((r, sign * coeff));
            }
            rhs.push(sign * row.rhs);
        }
        for var in &model.variables {
            cols[var.index].push((rhs.len(), -1.0));
            rhs.push(-var.lower_bound);
        }

        let mut col_ptr = Vec::with_capacity(n_var + 1);
        let mut row_idx = Vec::new();
        let mut values = Vec::new();
        for col in &mut cols {
            col_ptr.push(row_idx.len());
            col.sort_by_key(|(r, _)| *r);
            for &(r, v) in col.iter() {
                row_idx.push(r);
                values.push(v);
            }
        }
        col_ptr.push(row_idx.len());

        let a_mat = CscMatrix::new(rhs.len(), n_var, col_ptr, row_idx, values);
        let p_mat = CscMatrix::new(n_var, n_var, vec![0; n_var + 1], Vec::new(), Vec::new());
        let q = &model.objective.coefficients;
        let cones = [SupportedConeT::NonnegativeConeT(rhs.len())];

        let mut builder = DefaultSettingsBuilder::default();
        builder.verbose(false);
        if let Some(limit) = config.timeout {
            builder.time_limit(limit.as_secs_f64());
        }
        let settings = match builder.build() {
            Ok(settings) => settings,
            Err(e) => {
                return Ok(RawSolution::terminated(EngineStatus::Error(format!(
                    "Clarabel settings error: {e:?}"
                ))))
            }
        };

        let mut solver = match DefaultSolver::new(&p_mat, q, &a_mat, &rhs, &cones, settings) {
            Ok(solver) => solver,
            Err(e) => {
                return Ok(RawSolution::terminated(EngineStatus::Error(format!(
                    "Clarabel initialization failed: {e:?}"
                ))))
            }
        };
        solver.solve();

        let sol = &solver.solution;
        let iterations = sol.iterations as usize;
        let raw = match &sol.status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => {
                // P = 0, so obj_val is q'x as Clarabel evaluated it.
                RawSolution::optimal(sol.x.clone(), sol.obj_val)
            }
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                RawSolution::terminated(EngineStatus::Infeasible)
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                RawSolution::terminated(EngineStatus::Unbounded)
            }
            SolverStatus::NumericalError | SolverStatus::InsufficientProgress => {
                RawSolution::terminated(EngineStatus::NumericalError)
            }
            other => RawSolution::terminated(EngineStatus::Error(format!("{other:?}"))),
        };
        Ok(raw.with_iterations(iterations))
    }
}
