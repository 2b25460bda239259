//! Apply command implementation

use crate::cli::utils;
use crate::Action;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("apply")
        .about("Render every declared resource and record it in state")
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Applying configuration");

    let provider = utils::create_provider(matches)?;
    let result = provider.apply().await?;

    for applied in &result.applied {
        let verb = match applied.action {
            Action::Create => "created",
            Action::Update => "updated",
        };
        println!("  {} {} (id {})", verb, applied.address, applied.id);
    }
    for address in &result.deleted {
        println!("  deleted {address}");
    }
    for failure in &result.failed {
        println!("  failed {}: {}", failure.address, failure.error);
    }

    println!(
        "\nApply complete: {} applied, {} deleted, {} failed. State: {:?}",
        result.applied.len(),
        result.deleted.len(),
        result.failed.len(),
        provider.state_path()
    );

    if !result.is_success() {
        return Err(anyhow!("{} resource(s) failed", result.failed.len()));
    }

    Ok(())
}
