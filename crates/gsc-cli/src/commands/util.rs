use anyhow::{anyhow, Context, Result};
use gsc_algo::generator;
use gsc_algo::solver::{LpBackend, SolverRegistry};
use gsc_cli::{GscConfig, InputArgs};
use gsc_core::Instance;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Read `--instance` or generate one from the size flags.
pub fn load_instance(input: &InputArgs, config: &GscConfig) -> Result<Instance> {
    if let Some(path) = &input.instance {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading instance '{}'", path.display()))?;
        let instance = Instance::from_json(&json)
            .with_context(|| format!("parsing instance '{}'", path.display()))?;
        info!(
            "Loaded instance with {} centres and {} nodes from {}",
            instance.num_centres(),
            instance.num_nodes(),
            path.display()
        );
        return Ok(instance);
    }

    let (centres, nodes) = match (input.centres, input.nodes) {
        (Some(c), Some(n)) => (c, n),
        _ => return Err(anyhow!("either --instance or both --centres and --nodes are required")),
    };
    let generator_config = config.generator.generator_config(input.demand_scaled);
    Ok(generator::generate(centres, nodes, input.seed, &generator_config)?)
}

pub fn resolve_backend(id: &str) -> Result<Arc<dyn LpBackend>> {
    SolverRegistry::with_defaults()
        .get(id)
        .with_context(|| format!("resolving LP backend '{id}'"))
}

/// Write `text` to `out`, or stdout when `out` is None.
pub fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory '{}'", parent.display()))?;
            }
            fs::write(path, text).with_context(|| format!("writing '{}'", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}
