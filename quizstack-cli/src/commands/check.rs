//! `quizstack check` command

use super::configuration;
use anyhow::Result;
use colored::Colorize;
use quizstack_core::Configuration;
use tabled::{settings::Style, Table, Tabled};
use tracing::{debug, info};

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "FIELD")]
    field: String,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

/// Mask a secret value for display. Empty values stay visibly empty.
pub fn mask(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}

/// Rows plus the list of problems found.
fn inspect(config: &Configuration, default_region: &str) -> (Vec<FieldRow>, Vec<String>) {
    let mut problems = Vec::new();
    let mut rows = Vec::new();

    for (name, value) in config.runtime_environment() {
        let port = match name {
            "PORT" => Some(&config.port),
            "DB_PORT" => Some(&config.db_port),
            _ => None,
        };
        let status = match port.map(|p| p.require()) {
            Some(Err(err)) => {
                problems.push(err.to_string());
                "invalid".to_string()
            }
            Some(Ok(_)) => "ok".to_string(),
            None if name == "ENABLE_PLAYGROUND" => {
                (if config.playground_enabled() { "enabled" } else { "disabled" }).to_string()
            }
            None if value.is_empty() => "empty".to_string(),
            None => "set".to_string(),
        };
        let value = if Configuration::is_secret(name) { mask(&value) } else { value };
        rows.push(FieldRow { field: name.to_string(), value, status });
    }

    for (name, result) in [
        ("VPC_DB", config.require_vpc().map(str::to_string)),
        ("SG_DB", config.require_security_group().map(str::to_string)),
    ] {
        let (value, status) = match result {
            Ok(value) => (value, "ok".to_string()),
            Err(err) => {
                problems.push(err.to_string());
                (String::new(), "missing".to_string())
            }
        };
        rows.push(FieldRow { field: name.to_string(), value, status });
    }

    let (region, status) = match &config.region {
        Some(region) => (region.clone(), "ok"),
        None => (default_region.to_string(), "default"),
    };
    rows.push(FieldRow { field: "REGION".to_string(), value: region, status: status.to_string() });

    (rows, problems)
}

/// Show the resolved configuration and fail if it cannot be composed.
pub fn check(overrides: &[String], default_region: &str) -> Result<()> {
    let config = configuration(overrides)?;
    debug!(overrides = overrides.len(), "Checking configuration");
    let (rows, problems) = inspect(&config, default_region);
    info!(problems = problems.len(), "Configuration checked");

    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{}", table);

    if problems.is_empty() {
        println!("{} Configuration is complete", "✓".green().bold());
        return Ok(());
    }

    for problem in &problems {
        println!("  {} {}", "✗".red().bold(), problem);
    }
    Err(anyhow::anyhow!("Configuration has {} problem(s)", problems.len()))
}
