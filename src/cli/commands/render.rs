//! Render command implementation

use crate::cli::utils;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("render")
        .about("Print the manifest of one declared resource")
        .arg(
            clap::Arg::new("address")
                .help("Resource address (<type>.<name>)")
                .value_name("ADDRESS")
                .required(true),
        )
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let address = matches
        .get_one::<String>("address")
        .ok_or_else(|| anyhow!("Missing resource address"))?;
    let provider = utils::create_provider(matches)?;

    let projection = provider.render(address)?;
    print!("{}", projection.yaml);

    Ok(())
}
