//! Schema command implementation

use crate::cli::utils;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use manifest_catalog::{FieldSpec, FieldType};

pub fn command() -> Command {
    Command::new("schema")
        .about("Show the field catalog of a resource type")
        .arg(
            clap::Arg::new("type")
                .help("Resource type name")
                .value_name("TYPE")
                .required(true),
        )
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("json")
                .long("json")
                .help("Print the catalog entry as JSON")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let type_name = matches
        .get_one::<String>("type")
        .ok_or_else(|| anyhow!("Missing resource type"))?;
    let catalog = super::kinds::load_catalog(matches)?;
    let kind = catalog
        .get(type_name)
        .ok_or_else(|| anyhow!("Unknown resource type: {}", type_name))?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(kind)?);
        return Ok(());
    }

    println!("{type_name}");
    println!("  apiVersion: {}", kind.api_version);
    println!("  kind: {}", kind.kind);
    println!(
        "  scope: {}",
        if kind.is_namespaced() { "Namespaced" } else { "Cluster" }
    );
    if let Some(source) = &kind.source_path {
        println!("  source: {source:?}");
    }
    println!();
    println!("metadata:");
    print_fields(&kind.metadata_fields(), 1);
    print_fields(&kind.fields, 0);

    Ok(())
}

fn print_fields(fields: &[FieldSpec], depth: usize) {
    for field in fields {
        println!("{}{}", "  ".repeat(depth), describe(field));
        let mut nested = &field.field_type;
        while let FieldType::List { items, .. } = nested {
            nested = items;
        }
        if let FieldType::Object { fields } = nested {
            print_fields(fields, depth + 1);
        }
    }
}

fn describe(field: &FieldSpec) -> String {
    let mut line = format!("{}: {}", field.declarative_name, field.field_type.label());
    if field.manifest_name != field.declarative_name {
        line.push_str(&format!(" [{}]", field.manifest_name));
    }
    if field.required {
        line.push_str(" (required)");
    }

    let rules = &field.rules;
    if !rules.enum_values.is_empty() {
        line.push_str(&format!(" enum={}", rules.enum_values.join("|")));
    }
    if let Some(pattern) = &rules.pattern {
        line.push_str(&format!(" pattern={pattern}"));
    }
    if rules.min_length.is_some() || rules.max_length.is_some() {
        line.push_str(&format!(
            " length={}..{}",
            rules.min_length.map(|v| v.to_string()).unwrap_or_default(),
            rules.max_length.map(|v| v.to_string()).unwrap_or_default()
        ));
    }
    if rules.minimum.is_some() || rules.maximum.is_some() {
        line.push_str(&format!(
            " range={}..{}",
            rules.minimum.map(|v| v.to_string()).unwrap_or_default(),
            rules.maximum.map(|v| v.to_string()).unwrap_or_default()
        ));
    }
    line
}
