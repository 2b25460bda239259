//! Catalog error types

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("CRD {crd} is malformed: {reason}")]
    Malformed { crd: String, reason: String },

    #[error("CRD {crd}: fields {first:?} and {second:?} both translate to {declarative:?} at {path}")]
    NameCollision {
        crd: String,
        path: String,
        first: String,
        second: String,
        declarative: String,
    },

    #[error("resource type {0} is registered twice")]
    DuplicateType(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CatalogError {
    pub(crate) fn malformed(crd: &str, reason: impl Into<String>) -> Self {
        CatalogError::Malformed {
            crd: crd.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
