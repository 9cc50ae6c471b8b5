use crate::commands::util::write_output;
use anyhow::{Context, Result};
use gsc_algo::generator;
use gsc_cli::{GscConfig, SizeArgs};
use std::path::Path;
use tracing::info;

pub fn handle(size: &SizeArgs, out: Option<&Path>, config: &GscConfig) -> Result<()> {
    let generator_config = config.generator.generator_config(size.demand_scaled);
    let instance = generator::generate(size.centres, size.nodes, size.seed, &generator_config)?;
    info!(
        "Generated {} centres, {} nodes (capacity {:.3}, demand {:.3})",
        instance.num_centres(),
        instance.num_nodes(),
        instance.total_capacity(),
        instance.total_demand()
    );
    let json = serde_json::to_string_pretty(&instance).context("serializing instance to JSON")?;
    write_output(out, &json)
}
