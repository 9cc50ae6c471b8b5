use crate::commands::util::{load_instance, write_output};
use anyhow::{Context, Result};
use gsc_algo::{export, model};
use gsc_cli::{ExportFormat, GscConfig, InputArgs};
use gsc_core::CostMatrix;
use std::path::Path;

pub fn handle(
    input: &InputArgs,
    format: ExportFormat,
    out: Option<&Path>,
    config: &GscConfig,
) -> Result<()> {
    let instance = load_instance(input, config)?;
    let costs = CostMatrix::build(&instance, &config.generator.cost_params(input.distance_rate))?;
    let model = model::build(&instance, &costs)?;

    let text = match format {
        ExportFormat::Lp => export::to_lp_string(&model),
        ExportFormat::Standard => serde_json::to_string_pretty(&export::to_standard_form(&model))
            .context("serializing standard form to JSON")?,
    };
    write_output(out, &text)
}
