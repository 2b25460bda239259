//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("crd-manifests")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Render Kubernetes custom resources declared in configuration into YAML manifests")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::kinds::command())
            .subcommand(commands::schema::command())
            .subcommand(commands::render::command())
            .subcommand(commands::plan::command())
            .subcommand(commands::apply::command())
            .subcommand(commands::destroy::command())
            .subcommand(commands::state::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("kinds", sub_matches)) => commands::kinds::run(sub_matches).await,
            Some(("schema", sub_matches)) => commands::schema::run(sub_matches).await,
            Some(("render", sub_matches)) => commands::render::run(sub_matches).await,
            Some(("plan", sub_matches)) => commands::plan::run(sub_matches).await,
            Some(("apply", sub_matches)) => commands::apply::run(sub_matches).await,
            Some(("destroy", sub_matches)) => commands::destroy::run(sub_matches).await,
            Some(("state", sub_matches)) => commands::state::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::{anyhow, Result};
    use clap::Arg;
    use std::path::PathBuf;

    /// Default configuration file names, searched in the working directory
    pub const DEFAULT_CONFIG_PATHS: [&str; 4] = [
        "crd-manifests.yaml",
        "crd-manifests.yml",
        ".crd-manifests.yaml",
        ".crd-manifests.yml",
    ];

    /// `-c/--config` argument shared by every command that reads configuration
    pub fn config_arg() -> Arg {
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Configuration file path")
            .value_name("FILE")
    }

    /// Get configuration file path from arguments or use default
    pub fn get_config_path(matches: &clap::ArgMatches) -> Result<PathBuf> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            Ok(PathBuf::from(config_path))
        } else {
            for path in DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from) {
                if path.exists() {
                    return Ok(path);
                }
            }

            Err(anyhow!("No configuration file found. Use --config to specify a file or create one with 'crd-manifests init'"))
        }
    }

    /// Load configuration from file
    pub fn load_config(matches: &clap::ArgMatches) -> Result<crate::Config> {
        let config_path = get_config_path(matches)?;
        crate::Config::from_file(&config_path)
    }

    /// Create Provider instance
    pub fn create_provider(matches: &clap::ArgMatches) -> Result<crate::Provider> {
        let config_path = get_config_path(matches)?;
        crate::Provider::from_config_file(&config_path)
    }
}
