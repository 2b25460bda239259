//! Catalog source configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file or directory of CRD documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSource {
    /// Path to a CRD file or a directory scanned recursively
    pub path: PathBuf,

    /// Filters for CRDs (API version glob patterns)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
}

impl CatalogSource {
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("Catalog path cannot be empty"));
        }

        for filter in &self.filters {
            glob::Pattern::new(filter)
                .map_err(|e| anyhow!("Invalid catalog filter {:?}: {}", filter, e))?;
        }

        Ok(())
    }
}
