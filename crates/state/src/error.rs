//! State store error types

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum StateError {
    #[error("failed to access state file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode state file {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_yaml::Error),

    #[error("unsupported state file version {0}")]
    UnsupportedVersion(String),
}

pub type Result<T> = std::result::Result<T, StateError>;
