//! Provider settings

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Provider-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Prefix of every resource type name
    #[serde(default = "default_type_prefix")]
    pub type_prefix: String,

    /// State file location, relative to the configuration file
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Whether the embedded CRDs are part of the catalog
    #[serde(default = "default_true")]
    pub include_builtin: bool,

    /// Stop at the first failing resource
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            type_prefix: default_type_prefix(),
            state_path: default_state_path(),
            include_builtin: true,
            fail_fast: false,
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<()> {
        let valid_prefix = !self.type_prefix.is_empty()
            && self
                .type_prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid_prefix {
            return Err(anyhow!(
                "Type prefix must be non-empty lowercase letters, digits or '_': {:?}",
                self.type_prefix
            ));
        }

        if self.state_path.as_os_str().is_empty() {
            return Err(anyhow!("State path cannot be empty"));
        }

        Ok(())
    }
}

fn default_type_prefix() -> String {
    "k8s".to_string()
}

fn default_state_path() -> PathBuf {
    PathBuf::from("crd-manifests.state.yaml")
}

fn default_true() -> bool {
    true
}
