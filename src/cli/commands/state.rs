//! State command implementation

use crate::cli::utils;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("state")
        .about("Inspect the state file")
        .subcommand_required(true)
        .arg(utils::config_arg().global(true))
        .subcommand(Command::new("list").about("List tracked resource addresses"))
        .subcommand(
            Command::new("show")
                .about("Show one tracked resource")
                .arg(
                    clap::Arg::new("address")
                        .help("Resource address (<type>.<name>)")
                        .value_name("ADDRESS")
                        .required(true),
                )
                .arg(
                    clap::Arg::new("json")
                        .long("json")
                        .help("Print the entry as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", sub_matches)) => list(sub_matches).await,
        Some(("show", sub_matches)) => show(sub_matches).await,
        _ => Err(anyhow!("Unknown state subcommand")),
    }
}

async fn list(matches: &ArgMatches) -> Result<()> {
    let provider = utils::create_provider(matches)?;
    let state = provider.state().await?;

    if state.is_empty() {
        println!("No resources tracked in {:?}", provider.state_path());
        return Ok(());
    }

    for (address, entry) in &state.resources {
        println!(
            "{}  {}/{}  {}",
            address,
            entry.api_version,
            entry.kind,
            crate::utils::format_id(entry.id)
        );
    }

    Ok(())
}

async fn show(matches: &ArgMatches) -> Result<()> {
    let address = matches
        .get_one::<String>("address")
        .ok_or_else(|| anyhow!("Missing resource address"))?;
    let provider = utils::create_provider(matches)?;
    let state = provider.state().await?;
    let entry = state
        .get(address)
        .ok_or_else(|| anyhow!("No resource tracked at {}", address))?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(entry)?);
        return Ok(());
    }

    println!("address: {address}");
    println!("id: {}", entry.id);
    println!("api_version: {}", entry.api_version);
    println!("kind: {}", entry.kind);
    println!("yaml_sha256: {}", entry.yaml_sha256);
    println!(
        "updated_at: {}",
        entry.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("---");
    print!("{}", entry.yaml);

    Ok(())
}
