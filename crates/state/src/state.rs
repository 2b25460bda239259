//! State file document

use crate::error::{Result, StateError};
use crate::types::ResourceState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supported state file format version
pub const STATE_VERSION: &str = "1.0";

/// Every tracked resource, keyed by address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateFile {
    /// State file version
    pub version: String,

    /// Tool version that last wrote the file
    pub tool_version: String,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub resources: BTreeMap<String, ResourceState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

impl StateFile {
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            updated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            resources: BTreeMap::new(),
        }
    }

    /// Parse a state document
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn check_version(&self) -> Result<()> {
        if self.version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion(self.version.clone()));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Insert or replace the entry at its address
    pub fn put(&mut self, state: ResourceState) -> Option<ResourceState> {
        self.updated_at = Utc::now();
        self.resources.insert(state.address(), state)
    }

    pub fn remove(&mut self, address: &str) -> Option<ResourceState> {
        let removed = self.resources.remove(address);
        if removed.is_some() {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn get(&self, address: &str) -> Option<&ResourceState> {
        self.resources.get(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.resources.contains_key(address)
    }

    /// Tracked addresses in sorted order
    pub fn addresses(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.resources.clear();
        self.updated_at = Utc::now();
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, id: i64) -> ResourceState {
        ResourceState::new(
            "k8s_example_com_example_v1alpha1",
            name,
            serde_yaml::from_str("metadata: {name: demo}").unwrap(),
            id,
            "example.com/v1alpha1",
            "Example",
            "apiVersion: example.com/v1alpha1\nkind: Example\nmetadata:\n  name: demo\n",
        )
    }

    #[test]
    fn test_state_file_creation() {
        let state = StateFile::new();
        assert_eq!(state.version, "1.0");
        assert_eq!(state.tool_version, env!("CARGO_PKG_VERSION"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_put_replaces_by_address() {
        let mut state = StateFile::new();
        assert!(state.put(entry("demo", 1)).is_none());
        let previous = state.put(entry("demo", 2)).unwrap();

        assert_eq!(previous.id, 1);
        assert_eq!(state.len(), 1);
        assert_eq!(
            state.get("k8s_example_com_example_v1alpha1.demo").unwrap().id,
            2
        );
    }

    #[test]
    fn test_state_serialization() {
        let mut state = StateFile::new();
        state.put(entry("b", 1));
        state.put(entry("a", 2));

        let yaml = state.to_yaml().unwrap();
        let parsed = StateFile::parse(&yaml).unwrap();
        assert_eq!(parsed, state);
        assert_eq!(
            parsed.addresses(),
            vec![
                "k8s_example_com_example_v1alpha1.a",
                "k8s_example_com_example_v1alpha1.b"
            ]
        );
    }

    #[test]
    fn test_version_check() {
        let mut state = StateFile::new();
        assert!(state.check_version().is_ok());
        state.version = "2.0".to_string();
        assert!(matches!(
            state.check_version(),
            Err(StateError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }
}
