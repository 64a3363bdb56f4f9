//! `quizstack synth` command

use super::{composition_error, ComposeArgs};
use anyhow::{Context, Result};
use colored::Colorize;
use quizstack_core::OutputFormat;
use std::path::Path;
use tracing::{debug, info};

/// Compose the topology and write it to `output`, or stdout when unset.
pub fn synth(args: &ComposeArgs, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let composer = args.composer()?;
    let config = args.configuration()?;
    info!(
        format = %format,
        dns_tls = composer.settings().include_dns_tls,
        context = %args.context.display(),
        "Synthesizing topology"
    );

    let topology = composer.compose(&config).map_err(composition_error)?;
    let rendered = topology.render(format)?;

    match output {
        Some(path) => {
            debug!(path = %path.display(), bytes = rendered.len(), "Writing topology");
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Synthesized {} ({} resources, {}) to {}",
                "✓".green().bold(),
                topology.stack_name.bold(),
                topology.nodes().len(),
                format,
                path.display()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
