use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gsc_algo::SolutionStatus;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::job::BatchRunRecord;

/// File name of the manifest inside a batch output directory.
pub const MANIFEST_FILE: &str = "batch_manifest.json";

/// Outcome tally over a set of runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub optimal: usize,
    pub infeasible: usize,
    /// Solver errors plus runs that never produced a solution
    pub failed: usize,
}

impl RunCounts {
    pub fn tally(runs: &[BatchRunRecord]) -> Self {
        runs.iter().fold(Self::default(), |mut counts, run| {
            if run.status == SolutionStatus::Optimal.as_str() {
                counts.optimal += 1;
            } else if run.status == SolutionStatus::Infeasible.as_str() {
                counts.infeasible += 1;
            } else {
                counts.failed += 1;
            }
            counts
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchManifest {
    pub created_at: DateTime<Utc>,
    pub backend: String,
    pub num_centres: usize,
    pub num_nodes: usize,
    pub num_runs: usize,
    #[serde(flatten)]
    pub counts: RunCounts,
    pub runs: Vec<BatchRunRecord>,
}

impl BatchManifest {
    /// Stamp a finished batch with the current time.
    pub fn new(backend: &str, num_centres: usize, num_nodes: usize, runs: Vec<BatchRunRecord>) -> Self {
        Self {
            created_at: Utc::now(),
            backend: backend.to_string(),
            num_centres,
            num_nodes,
            num_runs: runs.len(),
            counts: RunCounts::tally(&runs),
            runs,
        }
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }
}

pub fn write_batch_manifest(path: &Path, manifest: &BatchManifest) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating manifest directory '{}'", dir.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating batch manifest '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest)
        .with_context(|| format!("serializing batch manifest '{}'", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("writing batch manifest '{}'", path.display()))
}

pub fn load_batch_manifest(path: &Path) -> Result<BatchManifest> {
    let file = File::open(path)
        .with_context(|| format!("opening batch manifest '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing batch manifest '{}'", path.display()))
}
