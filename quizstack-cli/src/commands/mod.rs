//! CLI command implementations

pub mod check;
pub mod init;
pub mod plan;
pub mod synth;

pub use check::check;
pub use init::init;
pub use plan::plan;
pub use synth::synth;

use anyhow::{Context, Result};
use clap::Args;
use quizstack_core::{
    ComposerSettings, ConfigResolver, Configuration, ContextLookup, QuizstackError,
    TopologyComposer,
};
use std::path::PathBuf;

/// Inputs shared by every command that composes a topology.
#[derive(Args, Debug, Clone)]
pub struct ComposeArgs {
    /// Settings file (JSON); defaults apply when it does not exist
    #[arg(short, long, default_value = "quizstack.json")]
    pub settings: PathBuf,

    /// Lookup context document describing existing resources (JSON)
    #[arg(short, long, default_value = "quizstack.context.json")]
    pub context: PathBuf,

    /// Include the DNS name and TLS certificate
    #[arg(long)]
    pub dns_tls: bool,

    /// Environment overrides (KEY=VALUE)
    #[arg(short, long)]
    pub env: Vec<String>,
}

impl ComposeArgs {
    /// Build a composer from the settings and lookup context files.
    pub fn composer(&self) -> Result<TopologyComposer<ContextLookup>> {
        let settings = ComposerSettings::load(&self.settings)
            .with_context(|| format!("Failed to load settings from {}", self.settings.display()))?;
        let lookup = ContextLookup::load(&self.context).with_context(|| {
            format!("Failed to load lookup context from {}", self.context.display())
        })?;

        let dns_tls = self.dns_tls || settings.include_dns_tls;
        Ok(TopologyComposer::new(lookup, settings).with_dns_tls(dns_tls))
    }

    pub fn configuration(&self) -> Result<Configuration> {
        configuration(&self.env)
    }
}

/// Resolve configuration from the process environment with `overrides`
/// applied on top.
pub fn configuration(overrides: &[String]) -> Result<Configuration> {
    let overrides =
        overrides.iter().map(|e| parse_env_override(e)).collect::<Result<Vec<_>>>()?;
    Ok(ConfigResolver::resolve(std::env::vars().chain(overrides)))
}

/// Parse a `KEY=VALUE` override. The value may be empty or contain `=`.
pub fn parse_env_override(raw: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = raw.splitn(2, '=').collect();
    if parts.len() != 2 || parts[0].trim().is_empty() {
        return Err(anyhow::anyhow!("Invalid env format: {}", raw));
    }
    Ok((parts[0].trim().to_string(), parts[1].to_string()))
}

/// Wrap a composition error with its failure class.
pub fn composition_error(err: QuizstackError) -> anyhow::Error {
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("Composition aborted ({})", kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_override() {
        assert_eq!(
            parse_env_override("PORT=4000").unwrap(),
            ("PORT".to_string(), "4000".to_string())
        );
        assert_eq!(
            parse_env_override("DB_PWD=a=b").unwrap(),
            ("DB_PWD".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_env_override("EMAIL=").unwrap().1, "");
        assert!(parse_env_override("PORT").is_err());
        assert!(parse_env_override("=4000").is_err());
    }

    #[test]
    fn test_overrides_win_over_process_env() {
        let config =
            configuration(&["PORT=4321".to_string(), "SG_DB=sg-cli".to_string()]).unwrap();
        assert_eq!(config.port.value(), Some(4321));
        assert_eq!(config.sg_db, "sg-cli");
    }

    #[test]
    fn test_composer_reads_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let context = dir.path().join("context.json");
        std::fs::write(&context, "{}").unwrap();

        let args = ComposeArgs {
            settings: dir.path().join("absent.json"),
            context,
            dns_tls: true,
            env: vec![],
        };
        let composer = args.composer().unwrap();
        assert!(composer.settings().include_dns_tls);

        let missing = ComposeArgs { context: dir.path().join("missing.json"), ..args };
        assert!(missing.composer().is_err());
    }

    #[test]
    fn test_composition_error_names_kind() {
        let err = composition_error(QuizstackError::HostedZoneNotFound {
            domain: "easyquiz.click".to_string(),
        });
        let msg = format!("{:#}", err);
        assert!(msg.contains("lookup failure"));
        assert!(msg.contains("easyquiz.click"));
    }
}
