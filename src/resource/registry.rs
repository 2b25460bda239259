//! Resource registry keyed by resource type name

use super::manifest::{ManifestResource, SharedClock};
use super::Resource;
use manifest_catalog::Catalog;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Every resource type served by the provider
#[derive(Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<String, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One manifest resource per catalog kind, all sharing one clock
    pub fn from_catalog(catalog: &Catalog, clock: SharedClock) -> Self {
        let mut registry = Self::new();
        for (type_name, kind) in catalog.iter() {
            registry.register(Arc::new(ManifestResource::new(
                type_name,
                kind.clone(),
                Arc::clone(&clock),
            )));
        }
        registry
    }

    /// Register a resource, replacing any previous one with the same type name
    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        self.resources
            .insert(resource.type_name().to_string(), resource);
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.get(type_name).cloned()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.resources.contains_key(type_name)
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
