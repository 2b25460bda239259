//! CRD Manifests Library
//!
//! Exposes Kubernetes custom resources as declarative resources. Every
//! resource type is derived from a CustomResourceDefinition; an instance is
//! validated against the kind's field catalog, rendered into a YAML manifest
//! and recorded in a local state file.

pub mod cli;
pub mod config;
pub mod resource;
pub mod utils;

pub use config::{CatalogSource, Config, ProviderConfig, ResourceDeclaration};
pub use manifest_catalog::{Catalog, CatalogError, ResourceKind};
pub use manifest_projector::{Clock, FixedClock, Projection, SystemClock};
pub use manifest_state::{ResourceState, StateFile, StateManager};
pub use resource::{ManifestResource, Resource, ResourceError, ResourceRegistry, ResourceRequest};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Main application context that coordinates all components
pub struct Provider {
    config: Config,
    catalog: Catalog,
    registry: ResourceRegistry,
    state_manager: StateManager,
}

impl Provider {
    /// Create a provider; relative paths in `config` resolve against `base_dir`
    pub fn new(config: Config, base_dir: &Path) -> Result<Self> {
        Self::with_clock(config, base_dir, Arc::new(SystemClock::new()))
    }

    /// Create a provider whose resources stamp ids from `clock`
    pub fn with_clock(config: Config, base_dir: &Path, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let catalog = build_catalog(&config, base_dir)?;
        for resource in &config.resources {
            if !catalog.contains(&resource.resource_type) {
                return Err(ProviderError::UnknownResourceType {
                    address: resource.address(),
                    resource_type: resource.resource_type.clone(),
                }
                .into());
            }
        }

        let registry = ResourceRegistry::from_catalog(&catalog, clock);
        let state_path = utils::resolve_path(&config.provider.state_path, base_dir)?;
        info!(
            "Provider ready with {} resource types and {} declared resources",
            registry.len(),
            config.resources.len()
        );

        Ok(Self {
            config,
            catalog,
            registry,
            state_manager: StateManager::new(state_path),
        })
    }

    /// Load a configuration file and create a provider for it
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = Config::from_file(path)?;
        Self::new(config, &utils::config_base_dir(path))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn state_path(&self) -> &Path {
        self.state_manager.path()
    }

    /// Load the current state file
    pub async fn state(&self) -> Result<StateFile> {
        Ok(self.state_manager.load_or_create().await?)
    }

    /// Validate every declared resource against its field catalog
    pub fn validate_resources(&self) -> Vec<(String, std::result::Result<(), ResourceError>)> {
        self.config
            .resources
            .iter()
            .map(|declaration| {
                let outcome = self.render_declaration(declaration).map(|_| ());
                (declaration.address(), outcome)
            })
            .collect()
    }

    /// Render the manifest of one declared resource without touching state
    pub fn render(&self, address: &str) -> Result<Projection> {
        let declaration = self
            .config
            .resource(address)
            .ok_or_else(|| ProviderError::UnknownAddress(address.to_string()))?;
        self.render_declaration(declaration)
            .map_err(|source| resource_failure(declaration, source))
    }

    /// Create or update every declared resource and drop removed ones
    pub async fn apply(&self) -> Result<ApplyResult> {
        info!("Applying {} resources", self.config.resources.len());

        let mut state = self.state_manager.load_or_create().await?;
        let mut result = ApplyResult::default();

        for declaration in &self.config.resources {
            let address = declaration.address();
            let resource = self.resource_for(declaration)?;
            let request = ResourceRequest::new(&declaration.name, declaration.attributes.clone());

            let outcome = match state.get(&address) {
                None => resource
                    .create(&request)
                    .await
                    .map(|new_state| (new_state, Action::Create)),
                Some(prior) => resource
                    .update(&request, prior)
                    .await
                    .map(|new_state| (new_state, Action::Update)),
            };

            match outcome {
                Ok((new_state, action)) => {
                    result.applied.push(AppliedResource {
                        address,
                        action,
                        id: new_state.id,
                    });
                    state.put(new_state);
                }
                Err(e) => {
                    error!("Failed to apply {}: {}", address, e);
                    if self.config.provider.fail_fast {
                        return Err(resource_failure(declaration, e));
                    }
                    result.failed.push(FailedResource {
                        address,
                        error: e.to_string(),
                    });
                }
            }
        }

        for address in self.removed_addresses(&state) {
            if let Some(prior) = state.get(&address) {
                if let Some(resource) = self.registry.get(&prior.resource_type) {
                    resource
                        .delete(prior)
                        .await
                        .map_err(|e| ProviderError::Resource {
                            address: address.clone(),
                            source: e,
                        })?;
                } else {
                    warn!(
                        "Resource type {} is no longer in the catalog, dropping {}",
                        prior.resource_type, address
                    );
                }
            }
            state.remove(&address);
            result.deleted.push(address);
        }

        self.state_manager.save(&state).await?;
        info!(
            "Apply finished: {} applied, {} deleted, {} failed",
            result.applied.len(),
            result.deleted.len(),
            result.failed.len()
        );
        Ok(result)
    }

    /// Compare freshly rendered manifests with the stored ones
    pub async fn plan(&self) -> Result<Plan> {
        let state = self.state_manager.load_or_create().await?;
        let mut plan = Plan::default();

        for declaration in &self.config.resources {
            let address = declaration.address();
            match self.render_declaration(declaration) {
                Ok(projection) => {
                    let action = match state.get(&address) {
                        None => PlanAction::Create,
                        Some(prior) if prior.yaml_matches(&projection.yaml) => {
                            PlanAction::Unchanged
                        }
                        Some(_) => PlanAction::Update,
                    };
                    plan.changes.push(PlannedChange {
                        address,
                        action,
                        yaml: Some(projection.yaml),
                    });
                }
                Err(e) => plan.failed.push(FailedResource {
                    address,
                    error: e.to_string(),
                }),
            }
        }

        for address in self.removed_addresses(&state) {
            plan.changes.push(PlannedChange {
                address,
                action: PlanAction::Delete,
                yaml: None,
            });
        }

        Ok(plan)
    }

    /// Delete every tracked resource and clear the state
    pub async fn destroy(&self) -> Result<Vec<String>> {
        let mut state = self.state_manager.load_or_create().await?;
        let addresses = state.addresses();

        for address in &addresses {
            if let Some(prior) = state.get(address) {
                if let Some(resource) = self.registry.get(&prior.resource_type) {
                    resource
                        .delete(prior)
                        .await
                        .map_err(|e| ProviderError::Resource {
                            address: address.clone(),
                            source: e,
                        })?;
                } else {
                    warn!(
                        "Resource type {} is no longer in the catalog, dropping {}",
                        prior.resource_type, address
                    );
                }
            }
            state.remove(address);
        }

        self.state_manager.save(&state).await?;
        info!("Destroyed {} resources", addresses.len());
        Ok(addresses)
    }

    fn removed_addresses(&self, state: &StateFile) -> Vec<String> {
        let declared: HashSet<String> = self
            .config
            .resources
            .iter()
            .map(ResourceDeclaration::address)
            .collect();
        state
            .addresses()
            .into_iter()
            .filter(|address| !declared.contains(address))
            .collect()
    }

    fn resource_for(&self, declaration: &ResourceDeclaration) -> Result<Arc<dyn Resource>> {
        self.registry.get(&declaration.resource_type).ok_or_else(|| {
            ProviderError::UnknownResourceType {
                address: declaration.address(),
                resource_type: declaration.resource_type.clone(),
            }
            .into()
        })
    }

    fn render_declaration(
        &self,
        declaration: &ResourceDeclaration,
    ) -> std::result::Result<Projection, ResourceError> {
        let request = ResourceRequest::new(&declaration.name, declaration.attributes.clone());
        match self.registry.get(&declaration.resource_type) {
            Some(resource) => resource.render(&request),
            None => Err(ResourceError::UnknownType(declaration.resource_type.clone())),
        }
    }
}

/// Build the catalog from the embedded CRDs and the configured sources
fn build_catalog(config: &Config, base_dir: &Path) -> Result<Catalog> {
    let prefix = config.provider.type_prefix.clone();
    let mut catalog = if config.provider.include_builtin {
        Catalog::builtin(prefix)?
    } else {
        Catalog::new(prefix)
    };

    for source in &config.catalogs {
        let path: PathBuf = utils::resolve_path(&source.path, base_dir)?;
        catalog
            .load_path(&path, &source.filters)
            .with_context(|| format!("Failed to load CRDs from {path:?}"))?;
    }

    Ok(catalog)
}

fn resource_failure(declaration: &ResourceDeclaration, source: ResourceError) -> anyhow::Error {
    ProviderError::Resource {
        address: declaration.address(),
        source,
    }
    .into()
}

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("Unknown resource type {resource_type} for {address}")]
    UnknownResourceType {
        address: String,
        resource_type: String,
    },

    #[error("No resource declared at {0}")]
    UnknownAddress(String),

    #[error("{address}: {source}")]
    Resource {
        address: String,
        #[source]
        source: ResourceError,
    },
}

/// Lifecycle operation performed during apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
}

/// One resource written to state by apply
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedResource {
    pub address: String,
    pub action: Action,
    pub id: i64,
}

/// One resource that could not be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct FailedResource {
    pub address: String,
    pub error: String,
}

/// Apply result
#[derive(Debug, Clone, Default)]
pub struct ApplyResult {
    pub applied: Vec<AppliedResource>,
    pub deleted: Vec<String>,
    pub failed: Vec<FailedResource>,
}

impl ApplyResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Planned action for one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Create,
    Update,
    Unchanged,
    Delete,
}

impl PlanAction {
    pub fn symbol(self) -> &'static str {
        match self {
            PlanAction::Create => "+",
            PlanAction::Update => "~",
            PlanAction::Unchanged => "=",
            PlanAction::Delete => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChange {
    pub address: String,
    pub action: PlanAction,

    /// Rendered manifest; absent for deletions
    pub yaml: Option<String>,
}

/// Plan result
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub changes: Vec<PlannedChange>,
    pub failed: Vec<FailedResource>,
}

impl Plan {
    pub fn count(&self, action: PlanAction) -> usize {
        self.changes.iter().filter(|c| c.action == action).count()
    }

    /// True when an apply would only re-stamp ids
    pub fn is_noop(&self) -> bool {
        self.failed.is_empty()
            && self
                .changes
                .iter()
                .all(|c| c.action == PlanAction::Unchanged)
    }
}
