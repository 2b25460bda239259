//! State manager for loading and persisting the state file

use crate::error::{Result, StateError};
use crate::state::StateFile;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Owns the location of one state file
pub struct StateManager {
    state_path: PathBuf,
}

impl StateManager {
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.state_path
    }

    /// Load the state file, or start an empty one if it does not exist yet
    pub async fn load_or_create(&self) -> Result<StateFile> {
        let content = match tokio::fs::read_to_string(&self.state_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at {:?}, starting empty", self.state_path);
                return Ok(StateFile::new());
            }
            Err(source) => {
                return Err(StateError::Io {
                    path: self.state_path.clone(),
                    source,
                })
            }
        };

        let state = StateFile::parse(&content).map_err(|source| StateError::Decode {
            path: self.state_path.clone(),
            source,
        })?;
        state.check_version()?;
        Ok(state)
    }

    /// Persist the state file
    ///
    /// The content is written to a sibling temporary file first and then
    /// renamed over the target, so readers never observe a partial file.
    pub async fn save(&self, state: &StateFile) -> Result<()> {
        let content = state.to_yaml()?;
        let temp_path = self.temp_path();
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StateError::Io { path, source }
        };

        if let Some(parent) = self.state_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(io_error(parent))?;
        }

        tokio::fs::write(&temp_path, content)
            .await
            .map_err(io_error(&temp_path))?;
        tokio::fs::rename(&temp_path, &self.state_path)
            .await
            .map_err(io_error(&self.state_path))?;

        debug!(
            "Saved {} resource(s) to {:?}",
            state.len(),
            self.state_path
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .state_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("state"));
        name.push(".tmp");
        self.state_path.with_file_name(name)
    }

    /// Get the default state file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("crd-manifests.state.yaml")
    }
}
