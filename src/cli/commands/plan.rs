//! Plan command implementation

use crate::cli::utils;
use crate::PlanAction;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("plan")
        .about("Show what apply would change, without writing state")
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("show-yaml")
                .long("show-yaml")
                .help("Print the rendered manifest of every created or updated resource")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Planning changes");

    let provider = utils::create_provider(matches)?;
    let plan = provider.plan().await?;
    let show_yaml = matches.get_flag("show-yaml");

    for change in &plan.changes {
        println!("  {} {}", change.action.symbol(), change.address);
        if show_yaml && matches!(change.action, PlanAction::Create | PlanAction::Update) {
            if let Some(yaml) = &change.yaml {
                for line in yaml.lines() {
                    println!("      {line}");
                }
            }
        }
    }
    for failure in &plan.failed {
        println!("  ! {}: {}", failure.address, failure.error);
    }

    println!(
        "\nPlan: {} to create, {} to update, {} unchanged, {} to delete",
        plan.count(PlanAction::Create),
        plan.count(PlanAction::Update),
        plan.count(PlanAction::Unchanged),
        plan.count(PlanAction::Delete)
    );

    if !plan.failed.is_empty() {
        return Err(anyhow!("{} resource(s) could not be rendered", plan.failed.len()));
    }

    Ok(())
}
