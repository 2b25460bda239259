//! Projection error types

use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum ProjectionError {
    #[error("failed to encode manifest: {0}")]
    Encoding(#[source] serde_yaml::Error),

    #[error("failed to decode manifest: {0}")]
    Decoding(#[source] serde_yaml::Error),
}

/// A single violation of the field catalog
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{path}: {message}")]
pub struct ValidationError {
    /// Attribute path, e.g. `spec.receivers[0].name`
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Every violation found in one declarative document
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// True if any violation was reported at the given path
    pub fn has_path(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}
