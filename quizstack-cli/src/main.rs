use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quizstack_core::{ComposerSettings, OutputFormat};
use std::path::PathBuf;

mod commands;

use commands::ComposeArgs;

#[derive(Parser)]
#[command(name = "quizstack")]
#[command(about = "Compose the easyquiz API cloud topology", long_about = None)]
struct Cli {
    /// Verbose logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose the topology and render it as a document
    Synth {
        #[command(flatten)]
        args: ComposeArgs,

        /// Output format (json, yaml)
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the order resources would be realized in
    Plan {
        #[command(flatten)]
        args: ComposeArgs,
    },

    /// Validate the resolved configuration without composing
    Check {
        /// Settings file (JSON)
        #[arg(short, long, default_value = "quizstack.json")]
        settings: PathBuf,

        /// Environment overrides (KEY=VALUE)
        #[arg(short, long)]
        env: Vec<String>,
    },

    /// Write a default settings file
    Init {
        /// Destination path
        #[arg(default_value = "quizstack.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    quizstack_core::init_observability(cli.verbose)?;

    match cli.command {
        Commands::Synth { args, format, output } => {
            commands::synth(&args, format, output.as_deref())?;
        }

        Commands::Plan { args } => {
            commands::plan(&args)?;
        }

        Commands::Check { settings, env } => {
            let settings = ComposerSettings::load(&settings)
                .with_context(|| format!("Failed to load settings from {}", settings.display()))?;
            commands::check(&env, &settings.default_region)?;
        }

        Commands::Init { path, force } => {
            commands::init(&path, force)?;
        }
    }

    Ok(())
}
