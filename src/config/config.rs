//! Main configuration structure and implementation

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::{CatalogSource, ProviderConfig, ResourceDeclaration};

/// Supported configuration version
pub const CONFIG_VERSION: &str = "1.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Additional CRD documents to load into the catalog
    #[serde(default)]
    pub catalogs: Vec<CatalogSource>,

    /// Declared resource instances
    #[serde(default)]
    pub resources: Vec<ResourceDeclaration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            provider: ProviderConfig::default(),
            catalogs: Vec::new(),
            resources: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {path:?}"))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid configuration file {path:?}"))?;
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file {path:?}"))?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        self.provider.validate()?;

        for catalog in &self.catalogs {
            catalog.validate()?;
        }

        let mut addresses = HashSet::new();
        for resource in &self.resources {
            resource.validate()?;
            let address = resource.address();
            if !addresses.insert(address.clone()) {
                return Err(anyhow!("Duplicate resource address: {}", address));
            }
        }

        Ok(())
    }

    /// Find a declared resource by address
    pub fn resource(&self, address: &str) -> Option<&ResourceDeclaration> {
        self.resources.iter().find(|r| r.address() == address)
    }

    /// Configuration written by `init --example`
    pub fn example() -> Result<Self> {
        let attributes = serde_yaml::from_str(
            r#"
metadata:
  name: team-a
  namespace: monitoring
  labels:
    team: a
spec:
  route:
    receiver: team-a-webhook
    group_by: [alertname]
    group_wait: 30s
  receivers:
    - name: team-a-webhook
      webhook_configs:
        - url: https://alerts.example.com/hook
          send_resolved: true
"#,
        )
        .context("Failed to parse the example resource")?;

        Ok(Self {
            resources: vec![ResourceDeclaration {
                resource_type: "k8s_monitoring_coreos_com_alertmanager_config_v1alpha1"
                    .to_string(),
                name: "team_a".to_string(),
                attributes,
            }],
            ..Self::default()
        })
    }
}
