//! `quizstack plan` command

use super::{composition_error, ComposeArgs};
use anyhow::Result;
use colored::Colorize;
use quizstack_core::PlanNode;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "#")]
    step: usize,
    #[tabled(rename = "LOGICAL ID")]
    logical_id: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "ORIGIN")]
    origin: String,
    #[tabled(rename = "DEPENDS ON")]
    depends_on: String,
}

fn rows(plan: Vec<PlanNode>) -> Vec<PlanRow> {
    plan.into_iter()
        .enumerate()
        .map(|(i, node)| PlanRow {
            step: i + 1,
            logical_id: node.logical_id,
            kind: node.kind.to_string(),
            origin: if node.imported { "imported" } else { "owned" }.to_string(),
            depends_on: if node.depends_on.is_empty() {
                "-".to_string()
            } else {
                node.depends_on.join(", ")
            },
        })
        .collect()
}

/// Print the realization order of the composed topology.
pub fn plan(args: &ComposeArgs) -> Result<()> {
    let composer = args.composer()?;
    let config = args.configuration()?;
    info!(dns_tls = composer.settings().include_dns_tls, "Planning realization order");

    let plan = composer.plan(&config).map_err(composition_error)?;
    let imported = plan.iter().filter(|n| n.imported).count();

    println!(
        "{} {} resources ({} imported, {} owned)",
        "→".cyan().bold(),
        plan.len(),
        imported,
        plan.len() - imported
    );

    let mut table = Table::new(rows(plan));
    table.with(Style::modern());
    println!("{}", table);

    Ok(())
}
