//! Destroy command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("destroy")
        .about("Delete every tracked resource and clear the state")
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Destroying tracked resources");

    let provider = utils::create_provider(matches)?;
    let removed = provider.destroy().await?;

    for address in &removed {
        println!("  deleted {address}");
    }
    println!("\nDestroy complete: {} resource(s) removed", removed.len());

    Ok(())
}
