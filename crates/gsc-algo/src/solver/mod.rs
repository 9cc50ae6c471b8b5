//! Solver adapter: hands a [`TransportModel`] to an LP engine and turns the
//! engine's answer into a validated [`Solution`].
//!
//! Engines sit behind the [`LpBackend`] trait and are looked up through a
//! [`SolverRegistry`]. Whatever a backend reports is treated as untrusted:
//! an `Optimal` answer is only accepted after its values satisfy every row of
//! the model and reproduce the claimed objective.

use crate::model::TransportModel;
use crate::solution::Solution;
use gsc_core::{GscError, GscResult};
use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

mod registry;
pub use registry::SolverRegistry;

#[cfg(any(feature = "solver-clarabel", feature = "solver-highs"))]
mod good_lp_backend;
#[cfg(feature = "solver-clarabel")]
pub use good_lp_backend::ClarabelBackend;
#[cfg(feature = "solver-highs")]
pub use good_lp_backend::HighsBackend;

#[cfg(feature = "solver-clarabel")]
mod clarabel_native;
#[cfg(feature = "solver-clarabel")]
pub use clarabel_native::ClarabelNativeBackend;

/// Termination status as reported by an engine, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NumericalError,
    Error(String),
}

/// Unvalidated engine output.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub status: EngineStatus,
    /// One value per model variable, in variable order
    pub values: Vec<f64>,
    pub objective: Option<f64>,
    pub iterations: Option<usize>,
}

impl RawSolution {
    /// Optimal values together with the objective the engine computed.
    pub fn optimal(values: Vec<f64>, objective: f64) -> Self {
        Self {
            objective: Some(objective),
            ..Self::optimal_values(values)
        }
    }

    /// Optimal values from an engine that does not report its objective.
    pub fn optimal_values(values: Vec<f64>) -> Self {
        Self {
            status: EngineStatus::Optimal,
            values,
            objective: None,
            iterations: None,
        }
    }

    /// A non-optimal termination carrying no values.
    pub fn terminated(status: EngineStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: None,
            iterations: None,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Relative tolerance for validating engine output
    pub tolerance: f64,
    /// Wall-clock limit for the engine call
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            timeout: None,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> GscResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(GscError::invalid(format!(
                "solver tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(GscError::invalid("solver timeout must be non-zero"));
        }
        Ok(())
    }
}

/// An LP engine.
///
/// Implementations translate the model into their own input format and report
/// raw values. They should return `Err(GscError::SolverUnavailable)` only when
/// the engine cannot be started; any other failure belongs in
/// [`EngineStatus`].
pub trait LpBackend: Send + Sync {
    /// Unique identifier (e.g. "clarabel", "highs")
    fn id(&self) -> &str;

    /// Check if this backend can run in the current build and environment
    fn is_available(&self) -> bool {
        true
    }

    fn solve(&self, model: &TransportModel, config: &SolverConfig) -> GscResult<RawSolution>;
}

/// Solve `model` with `backend` and validate the result.
///
/// Returns `Err` for a bad config or when the backend is unavailable. Every
/// other outcome, including timeouts and engine failures, is a [`Solution`]
/// with the matching status.
pub fn solve(
    model: &TransportModel,
    backend: &Arc<dyn LpBackend>,
    config: &SolverConfig,
) -> GscResult<Solution> {
    config.validate()?;
    if !backend.is_available() {
        return Err(GscError::SolverUnavailable(format!(
            "backend '{}' is not available",
            backend.id()
        )));
    }

    debug!(
        backend = backend.id(),
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        "invoking LP engine"
    );
    let start = Instant::now();
    let outcome = match config.timeout {
        None => backend.solve(model, config),
        Some(limit) => solve_with_timeout(model, backend, config, limit)?,
    };
    let elapsed = start.elapsed();

    let solution = match outcome {
        Ok(raw) => interpret(model, raw, config.tolerance),
        Err(err @ GscError::SolverUnavailable(_)) => return Err(err),
        Err(err) => Solution::solver_error(format!("backend failed: {err}")),
    };

    if !solution.is_optimal() {
        warn!(
            backend = backend.id(),
            status = %solution.status,
            message = solution.message.as_deref().unwrap_or(""),
            "solve did not produce an optimal plan"
        );
    }

    Ok(solution
        .with_backend(backend.id())
        .with_solve_time(elapsed))
}

/// Run the engine on a worker thread and give up after `limit`.
///
/// The outer `Err` is a failure to start the worker; the inner result is what
/// the engine returned, or a timeout/panic turned into a backend error.
fn solve_with_timeout(
    model: &TransportModel,
    backend: &Arc<dyn LpBackend>,
    config: &SolverConfig,
    limit: Duration,
) -> GscResult<GscResult<RawSolution>> {
    let (tx, rx) = mpsc::channel();
    let model = model.clone();
    let worker_backend = Arc::clone(backend);
    let worker_config = config.clone();

    thread::Builder::new()
        .name(format!("gsc-solver-{}", backend.id()))
        .spawn(move || {
            // The receiver is gone if we already timed out.
            let _ = tx.send(worker_backend.solve(&model, &worker_config));
        })
        .map_err(|e| GscError::SolverUnavailable(format!("cannot start solver thread: {e}")))?;

    Ok(match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(GscError::Other(format!(
            "timed out after {:.3}s",
            limit.as_secs_f64()
        ))),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(GscError::Other("solver thread terminated without a result".into()))
        }
    })
}

fn interpret(model: &TransportModel, raw: RawSolution, tolerance: f64) -> Solution {
    match &raw.status {
        EngineStatus::Optimal => match verify(model, &raw, tolerance) {
            Ok(solution) => solution.with_iterations(raw.iterations),
            Err(reason) => Solution::solver_error(format!("engine result rejected: {reason}")),
        },
        EngineStatus::Infeasible => Solution::infeasible("engine reported the model infeasible"),
        EngineStatus::Unbounded => Solution::solver_error("engine reported the model unbounded"),
        EngineStatus::NumericalError => Solution::solver_error("engine hit a numerical error"),
        EngineStatus::Error(msg) => Solution::solver_error(format!("engine error: {msg}")),
    }
}

/// Accept an engine's optimal answer only if it is a feasible plan whose cost
/// matches the claimed objective.
///
/// The accepted solution carries the engine's objective when it reported one,
/// and flows with interior-point residue cleared (see `clear_residue`).
fn verify(model: &TransportModel, raw: &RawSolution, tol: f64) -> Result<Solution, String> {
    if raw.values.len() != model.num_variables() {
        return Err(format!(
            "expected {} values, got {}",
            model.num_variables(),
            raw.values.len()
        ));
    }

    let scale = model
        .constraints
        .iter()
        .map(|row| row.rhs.abs())
        .fold(1.0_f64, f64::max);

    let mut values = Vec::with_capacity(raw.values.len());
    for (var, &v) in model.variables.iter().zip(&raw.values) {
        if !v.is_finite() {
            return Err(format!("{} is not finite", var.name()));
        }
        if v < var.lower_bound - tol * scale {
            return Err(format!("{} = {v} is below its lower bound", var.name()));
        }
        values.push(v.max(var.lower_bound));
    }

    check_rows(model, &values, tol)?;

    let recomputed = model.evaluate_objective(&values);
    let objective = match raw.objective {
        Some(claimed) => {
            if !claimed.is_finite()
                || (claimed - recomputed).abs() > tol * recomputed.abs().max(1.0)
            {
                return Err(format!(
                    "claimed objective {claimed} differs from recomputed {recomputed}"
                ));
            }
            claimed
        }
        None => recomputed,
    };

    let values = match clear_residue(model, &values, tol * scale, tol) {
        Some(cleaned) => cleaned,
        None => {
            debug!("residue clearing broke a row, keeping engine values");
            values
        }
    };

    let flows: BTreeMap<_, _> = model
        .variables
        .iter()
        .zip(values)
        .map(|(var, v)| ((var.centre, var.node), v))
        .collect();

    Ok(Solution::optimal(flows, objective, ""))
}

fn check_rows(model: &TransportModel, values: &[f64], tol: f64) -> Result<(), String> {
    for row in &model.constraints {
        let violation = row.violation(values);
        if violation > tol * row.rhs.abs().max(1.0) {
            return Err(format!(
                "{} violated by {violation:.3e} (rhs {})",
                row.kind.name(),
                row.rhs
            ));
        }
    }
    Ok(())
}

/// Snap flows within `threshold` of their bound onto the bound.
///
/// Interior-point engines leave small positive amounts on routes a vertex
/// solution would not use. Each node's removed amount moves onto its largest
/// remaining inflow, so demand rows keep their activity. Returns `None` when
/// the cleaned plan no longer satisfies every row within `tol`.
fn clear_residue(
    model: &TransportModel,
    values: &[f64],
    threshold: f64,
    tol: f64,
) -> Option<Vec<f64>> {
    let mut cleaned = values.to_vec();
    // Demand rows have unit coefficients and every variable sits in exactly one.
    for row in model.demand_constraints() {
        let mut removed = 0.0;
        let mut largest: Option<usize> = None;
        for &(k, _) in &row.terms {
            let bound = model.variables[k].lower_bound;
            if cleaned[k] - bound <= threshold {
                removed += cleaned[k] - bound;
                cleaned[k] = bound;
            } else if largest.map_or(true, |l| cleaned[k] > cleaned[l]) {
                largest = Some(k);
            }
        }
        if let Some(k) = largest {
            cleaned[k] += removed;
        }
    }
    check_rows(model, &cleaned, tol).ok().map(|()| cleaned)
}
