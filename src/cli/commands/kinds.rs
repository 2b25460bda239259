//! Kinds command implementation

use crate::cli::utils;
use crate::{Catalog, Config, Provider, ProviderConfig};
use anyhow::Result;
use clap::{ArgMatches, Command};
use std::path::Path;

pub fn command() -> Command {
    Command::new("kinds")
        .about("List the resource types in the catalog")
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("builtin")
                .long("builtin")
                .help("List only the embedded kinds, without reading configuration")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let catalog = load_catalog(matches)?;

    println!("Resource types ({}):", catalog.len());
    for (type_name, kind) in catalog.iter() {
        println!("  {type_name}");
        println!(
            "    {} {} ({}, {} fields)",
            kind.api_version,
            kind.kind,
            if kind.is_namespaced() {
                "namespaced"
            } else {
                "cluster-scoped"
            },
            kind.field_count()
        );
    }

    Ok(())
}

/// Catalog of the configured provider; the embedded kinds when there is no configuration
pub(crate) fn load_catalog(matches: &ArgMatches) -> Result<Catalog> {
    if matches.try_get_one::<bool>("builtin").ok().flatten() == Some(&true) {
        return Ok(Catalog::builtin(ProviderConfig::default().type_prefix)?);
    }

    let provider = match utils::get_config_path(matches) {
        Ok(path) => Provider::from_config_file(&path)?,
        Err(_) => Provider::new(Config::default(), Path::new("."))?,
    };
    Ok(provider.catalog().clone())
}
