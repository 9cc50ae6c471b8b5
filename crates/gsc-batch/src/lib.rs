pub mod job;
pub mod manifest;
pub mod runner;

pub use job::{seed_range, BatchRunRecord};
pub use manifest::{load_batch_manifest, write_batch_manifest, BatchManifest, RunCounts, MANIFEST_FILE};
pub use runner::{run_batch, BatchConfig, BatchSummary};
