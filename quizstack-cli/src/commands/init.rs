//! `quizstack init` command

use anyhow::{Context, Result};
use colored::Colorize;
use quizstack_core::ComposerSettings;
use std::path::Path;
use tracing::info;

/// Write a default settings file. Refuses to overwrite unless `force`.
pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let settings = ComposerSettings::default();
    info!(path = %path.display(), force, "Writing default settings");
    settings.save(path).with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Wrote default settings to {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    println!("  {} stack:  {}", "•".dimmed(), settings.stack_name);
    println!("  {} image:  {}", "•".dimmed(), settings.image);
    println!("  {} region: {}", "•".dimmed(), settings.default_region);
    Ok(())
}
