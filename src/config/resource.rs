//! Declared resource instances

use anyhow::{anyhow, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One resource instance in the configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceDeclaration {
    /// Resource type name
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Instance name, unique per type
    pub name: String,

    /// Declarative attributes (`metadata`, `spec`, ...)
    #[serde(default)]
    pub attributes: serde_yaml::Value,
}

impl ResourceDeclaration {
    /// State address (`<type>.<name>`)
    pub fn address(&self) -> String {
        manifest_state::address(&self.resource_type, &self.name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.resource_type.is_empty() {
            return Err(anyhow!("Resource type cannot be empty"));
        }

        let name_pattern = Regex::new("^[A-Za-z_][A-Za-z0-9_-]*$")?;
        if !name_pattern.is_match(&self.name) {
            return Err(anyhow!(
                "Invalid resource name {:?} for {}: use letters, digits, '_' or '-'",
                self.name,
                self.resource_type
            ));
        }

        Ok(())
    }
}
