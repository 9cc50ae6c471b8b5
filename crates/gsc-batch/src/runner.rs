use crate::job::{BatchRunRecord, ERROR_STATUS};
use crate::manifest::{write_batch_manifest, BatchManifest, RunCounts};
use anyhow::{Context, Result};
use gsc_algo::pipeline::{self, PipelineRequest};
use gsc_algo::solver::{LpBackend, SolverConfig, SolverRegistry};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// One batch: the same request template solved once per seed.
pub struct BatchConfig {
    /// Size and parameter template; its `seed` is replaced per run
    pub request: PipelineRequest,
    pub seeds: Vec<u64>,
    pub backend: String,
    pub solver: SolverConfig,
    /// Manifest (and per-run results) go here when set
    pub output_root: Option<PathBuf>,
    pub write_results: bool,
    /// 0 = one thread per CPU
    pub threads: usize,
}

/// Summary returned after the run so clients can log outcome counts and manifest location.
pub struct BatchSummary {
    pub optimal: usize,
    pub infeasible: usize,
    pub failed: usize,
    pub manifest_path: Option<PathBuf>,
    pub runs: Vec<BatchRunRecord>,
}

pub fn run_batch(config: &BatchConfig) -> Result<BatchSummary> {
    let backend = SolverRegistry::with_defaults()
        .get(&config.backend)
        .with_context(|| format!("resolving LP backend '{}'", config.backend))?;

    if let Some(root) = &config.output_root {
        fs::create_dir_all(root)
            .with_context(|| format!("creating batch output root '{}'", root.display()))?;
    }

    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building Rayon thread pool for batch runs")?;

    info!(
        runs = config.seeds.len(),
        threads = thread_count,
        backend = backend.id(),
        "starting batch"
    );

    // Each run owns its seed, so results do not depend on scheduling.
    let runs: Vec<BatchRunRecord> = pool.install(|| {
        config
            .seeds
            .par_iter()
            .map(|&seed| run_one(seed, config, &backend))
            .collect()
    });

    let RunCounts {
        optimal,
        infeasible,
        failed,
    } = RunCounts::tally(&runs);
    info!(optimal, infeasible, failed, "batch finished");

    let manifest_path = match &config.output_root {
        Some(root) => {
            let manifest = BatchManifest::new(
                backend.id(),
                config.request.num_centres,
                config.request.num_nodes,
                runs.clone(),
            );
            let path = BatchManifest::path_in(root);
            write_batch_manifest(&path, &manifest)?;
            Some(path)
        }
        None => None,
    };

    Ok(BatchSummary {
        optimal,
        infeasible,
        failed,
        manifest_path,
        runs,
    })
}

fn run_one(seed: u64, config: &BatchConfig, backend: &Arc<dyn LpBackend>) -> BatchRunRecord {
    let mut request = config.request.clone();
    request.seed = Some(seed);

    let runner = || -> Result<BatchRunRecord> {
        let outcome = pipeline::run(&request, backend, &config.solver)?;
        let output = match (&config.output_root, config.write_results) {
            (Some(root), true) => {
                let dir = root.join(format!("seed-{seed}"));
                fs::create_dir_all(&dir)
                    .with_context(|| format!("creating run directory '{}'", dir.display()))?;
                let path = dir.join("result.json");
                outcome.result.to_json(&path)?;
                Some(path.display().to_string())
            }
            _ => None,
        };
        Ok(BatchRunRecord::from_outcome(seed, &outcome, output))
    };

    match runner() {
        Ok(record) => record,
        Err(err) => {
            warn!(seed, status = ERROR_STATUS, "batch run failed: {err:#}");
            BatchRunRecord::failed(seed, format!("{err:#}"))
        }
    }
}
