//! Registry of resource kinds keyed by resource type name

use crate::builtin;
use crate::error::{CatalogError, Result};
use crate::parser::CrdParser;
use crate::schema::ResourceKind;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// All resource kinds known to the provider
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    prefix: String,
    kinds: BTreeMap<String, ResourceKind>,
}

impl Catalog {
    /// Create an empty catalog whose type names use the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            kinds: BTreeMap::new(),
        }
    }

    /// Catalog preloaded with the embedded CRDs
    pub fn builtin(prefix: impl Into<String>) -> Result<Self> {
        let mut catalog = Self::new(prefix);
        for kind in builtin::kinds()? {
            catalog.register(kind)?;
        }
        Ok(catalog)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a kind, returning its type name
    pub fn register(&mut self, kind: ResourceKind) -> Result<String> {
        let type_name = kind.type_name(&self.prefix);
        if self.kinds.contains_key(&type_name) {
            return Err(CatalogError::DuplicateType(type_name));
        }
        debug!("Registered resource type {}", type_name);
        self.kinds.insert(type_name.clone(), kind);
        Ok(type_name)
    }

    /// Load CRDs from a file or directory and register those matching the filters
    pub fn load_path(&mut self, path: &Path, filters: &[String]) -> Result<Vec<String>> {
        let parser = CrdParser::new();
        let kinds = if path.is_dir() {
            parser.parse_from_directory(path, filters)?
        } else {
            let mut kinds = parser.parse_file(path)?;
            kinds.retain(|kind| parser.matches_filters(kind, filters));
            kinds
        };

        let mut registered = Vec::with_capacity(kinds.len());
        for kind in kinds {
            registered.push(self.register(kind)?);
        }

        info!("Loaded {} resource types from {:?}", registered.len(), path);
        Ok(registered)
    }

    pub fn get(&self, type_name: &str) -> Option<&ResourceKind> {
        self.kinds.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.kinds.contains_key(type_name)
    }

    /// Iterate kinds in type name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceKind)> {
        self.kinds.iter().map(|(name, kind)| (name.as_str(), kind))
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.kinds.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin("k8s").unwrap();
        assert_eq!(catalog.prefix(), "k8s");
        assert!(catalog.contains("k8s_monitoring_coreos_com_alertmanager_config_v1alpha1"));
        assert!(catalog.contains("k8s_flows_knative_dev_sequence_v1"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut catalog = Catalog::builtin("k8s").unwrap();
        let kind = catalog
            .get("k8s_flows_knative_dev_sequence_v1")
            .cloned()
            .unwrap();

        match catalog.register(kind) {
            Err(CatalogError::DuplicateType(name)) => {
                assert_eq!(name, "k8s_flows_knative_dev_sequence_v1")
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_path_single_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("widget.yaml");
        std::fs::write(
            &path,
            r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  names:
    kind: Widget
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
"#,
        )
        .unwrap();

        let mut catalog = Catalog::new("k8s");
        let names = catalog.load_path(&path, &[]).unwrap();
        assert_eq!(names, vec!["k8s_example_com_widget_v1"]);

        let mut filtered = Catalog::new("k8s");
        let names = filtered
            .load_path(&path, &["monitoring.coreos.com/*".to_string()])
            .unwrap();
        assert!(names.is_empty());
        assert!(filtered.is_empty());
    }
}
