use anyhow::Result;
use gsc_algo::solver::SolverRegistry;
use std::io::{self, Write};
use tabwriter::TabWriter;

pub fn handle(default_backend: &str) -> Result<()> {
    let registry = SolverRegistry::with_defaults();
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "BACKEND\tAVAILABLE\tDEFAULT")?;
    for id in registry.list() {
        let available = registry.get(id).is_ok();
        let marker = if id == default_backend { "*" } else { "" };
        writeln!(writer, "{id}\t{}\t{marker}", if available { "yes" } else { "no" })?;
    }
    writer.flush()?;
    Ok(())
}
