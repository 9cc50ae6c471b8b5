use anyhow::Result;
use gsc_algo::pipeline::PipelineRequest;
use gsc_batch::{run_batch, seed_range, BatchConfig};
use gsc_cli::{BatchSizeArgs, GscConfig, SolverArgs};
use std::path::PathBuf;
use tracing::info;

pub struct BatchOptions {
    pub runs: usize,
    pub seed_start: u64,
    pub threads: usize,
    pub out: Option<PathBuf>,
    pub write_results: bool,
}

pub fn handle(
    size: &BatchSizeArgs,
    solver: &SolverArgs,
    options: BatchOptions,
    config: &GscConfig,
) -> Result<()> {
    let mut request = PipelineRequest::new(size.centres, size.nodes, None);
    request.generator = config.generator.generator_config(size.demand_scaled);
    request.costs = config.generator.cost_params(None);

    let batch = BatchConfig {
        request,
        seeds: seed_range(options.seed_start, options.runs),
        backend: config.solver.backend(solver.backend.as_deref()).to_string(),
        solver: config.solver.solver_config(solver.tolerance, solver.timeout)?,
        output_root: options.out,
        write_results: options.write_results,
        threads: options.threads,
    };
    let summary = run_batch(&batch)?;

    println!(
        "Batch finished: {} optimal, {} infeasible, {} failed",
        summary.optimal, summary.infeasible, summary.failed
    );
    if let Some(path) = &summary.manifest_path {
        info!("Manifest written to {}", path.display());
        println!("Manifest: {}", path.display());
    }
    Ok(())
}
