//! Validate command implementation

use crate::cli::utils;
use crate::Provider;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate the configuration and every declared resource")
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration file");

    let config_path = utils::get_config_path(matches)?;
    let config = utils::load_config(matches)?;

    println!("Configuration file is valid!");
    println!("Version: {}", config.version);
    println!("Catalog sources: {}", config.catalogs.len());
    println!("Resources: {}", config.resources.len());

    let provider = Provider::new(config, &crate::utils::config_base_dir(&config_path))?;
    let mut invalid = 0;
    for (address, outcome) in provider.validate_resources() {
        match outcome {
            Ok(()) => println!("  ✓ {address}"),
            Err(e) => {
                invalid += 1;
                println!("  ✗ {address}: {e}");
            }
        }
    }

    if invalid > 0 {
        return Err(anyhow!("{} resource(s) failed validation", invalid));
    }

    Ok(())
}
