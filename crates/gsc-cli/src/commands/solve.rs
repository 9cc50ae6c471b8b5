use crate::commands::util::{load_instance, resolve_backend, write_output};
use anyhow::{Context, Result};
use gsc_algo::pipeline;
use gsc_cli::{GscConfig, InputArgs, OutputFormat, SolverArgs};
use std::path::Path;
use tracing::info;

pub struct SolveOutputs<'a> {
    pub format: OutputFormat,
    pub json: Option<&'a Path>,
    pub csv: Option<&'a Path>,
}

pub fn handle(
    input: &InputArgs,
    solver: &SolverArgs,
    outputs: SolveOutputs<'_>,
    config: &GscConfig,
) -> Result<()> {
    let instance = load_instance(input, config)?;
    let backend = resolve_backend(config.solver.backend(solver.backend.as_deref()))?;
    let solver_config = config.solver.solver_config(solver.tolerance, solver.timeout)?;
    let cost_params = config.generator.cost_params(input.distance_rate);

    let outcome = pipeline::run_instance(instance, &cost_params, &backend, &solver_config)?;
    info!(
        "Solved with {}: {} routes, status {}",
        backend.id(),
        outcome.result.routes.len(),
        outcome.result.status
    );

    match outputs.format {
        OutputFormat::Text => write_output(None, &outcome.result.summary())?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.result)
                .context("serializing result to JSON")?;
            write_output(None, &json)?;
        }
    }
    if let Some(path) = outputs.json {
        outcome.result.to_json(path)?;
    }
    if let Some(path) = outputs.csv {
        outcome.result.to_csv(path)?;
    }
    Ok(())
}
