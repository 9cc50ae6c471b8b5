//! End-to-end run: generate, pre-check, cost, build, solve, structure.

use crate::feasibility::{self, FeasibilityReport};
use crate::generator::{self, GeneratorConfig};
use crate::model::{self, TransportModel};
use crate::solution::Solution;
use crate::solver::{self, LpBackend, SolverConfig};
use crate::structure::{self, StructuredResult};
use gsc_core::{CostMatrix, CostParams, GscResult, Instance};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything needed to produce and solve one random instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub num_centres: usize,
    pub num_nodes: usize,
    pub seed: Option<u64>,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub costs: CostParams,
}

impl PipelineRequest {
    pub fn new(num_centres: usize, num_nodes: usize, seed: Option<u64>) -> Self {
        Self {
            num_centres,
            num_nodes,
            seed,
            generator: GeneratorConfig::default(),
            costs: CostParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub instance: Instance,
    pub feasibility: FeasibilityReport,
    pub costs: CostMatrix,
    /// Absent when the capacity pre-check failed
    pub model: Option<TransportModel>,
    pub solution: Solution,
    pub result: StructuredResult,
}

/// Generate an instance from `request` and solve it.
pub fn run(
    request: &PipelineRequest,
    backend: &Arc<dyn LpBackend>,
    solver_config: &SolverConfig,
) -> GscResult<PipelineOutcome> {
    let instance = generator::generate(
        request.num_centres,
        request.num_nodes,
        request.seed,
        &request.generator,
    )?;
    info!(
        centres = instance.num_centres(),
        nodes = instance.num_nodes(),
        seed = ?request.seed,
        "generated instance"
    );
    run_instance(instance, &request.costs, backend, solver_config)
}

/// Solve an existing instance.
pub fn run_instance(
    instance: Instance,
    cost_params: &CostParams,
    backend: &Arc<dyn LpBackend>,
    solver_config: &SolverConfig,
) -> GscResult<PipelineOutcome> {
    let feasibility = feasibility::check(&instance);
    let costs = CostMatrix::build(&instance, cost_params)?;

    if !feasibility.is_feasible() {
        warn!(
            total_capacity = feasibility.total_capacity,
            total_demand = feasibility.total_demand,
            "total capacity below total demand, skipping solve"
        );
        let solution = Solution::infeasible(format!(
            "total capacity {:.4} is below total demand {:.4}",
            feasibility.total_capacity, feasibility.total_demand
        ));
        let result = structure::structure(&solution, &instance, &costs)?;
        return Ok(PipelineOutcome {
            instance,
            feasibility,
            costs,
            model: None,
            solution,
            result,
        });
    }

    let start = Instant::now();
    let model = model::build(&instance, &costs)?;
    debug!(
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "built transport model"
    );

    let solution = solver::solve(&model, backend, solver_config)?;
    info!(
        backend = %solution.backend,
        status = %solution.status,
        objective = ?solution.objective_value,
        iterations = ?solution.iterations,
        solve_ms = solution.solve_time.as_millis() as u64,
        "solve finished"
    );

    let result = structure::structure(&solution, &instance, &costs)?;
    Ok(PipelineOutcome {
        instance,
        feasibility,
        costs,
        model: Some(model),
        solution,
        result,
    })
}
