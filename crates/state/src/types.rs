//! State entry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Persisted outputs of one resource instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceState {
    /// Resource type name
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Instance name within the configuration
    pub name: String,

    /// Declarative input as last applied
    pub attributes: serde_yaml::Value,

    /// Nanosecond timestamp of the last create or update
    pub id: i64,

    pub api_version: String,
    pub kind: String,

    /// Rendered manifest
    pub yaml: String,

    /// SHA256 of `yaml`
    pub yaml_sha256: String,

    pub updated_at: DateTime<Utc>,
}

impl ResourceState {
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        attributes: serde_yaml::Value,
        id: i64,
        api_version: impl Into<String>,
        kind: impl Into<String>,
        yaml: impl Into<String>,
    ) -> Self {
        let yaml = yaml.into();
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            attributes,
            id,
            api_version: api_version.into(),
            kind: kind.into(),
            yaml_sha256: digest(&yaml),
            yaml,
            updated_at: Utc::now(),
        }
    }

    /// State address (`<type>.<name>`)
    pub fn address(&self) -> String {
        address(&self.resource_type, &self.name)
    }

    /// Whether the stored manifest equals the given text
    pub fn yaml_matches(&self, yaml: &str) -> bool {
        self.yaml_sha256 == digest(yaml)
    }
}

/// Build a state address from a type name and an instance name
pub fn address(resource_type: &str, name: &str) -> String {
    format!("{resource_type}.{name}")
}

/// Hex encoded SHA256 of a manifest text
pub fn digest(yaml: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(yaml.as_bytes());
    hex::encode(hasher.finalize())
}
