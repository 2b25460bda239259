//! Resource lifecycle
//!
//! Every resource type exposes the four lifecycle operations of the host.
//! `create` and `update` render the manifest from the current declaration;
//! `read` and `delete` defer entirely to the host state store.

use async_trait::async_trait;
use manifest_catalog::ResourceKind;
use manifest_projector::{Projection, ProjectionError, ValidationErrors};
use manifest_state::ResourceState;

pub mod manifest;
pub mod registry;

pub use manifest::ManifestResource;
pub use registry::ResourceRegistry;

/// Declared input for one resource instance
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    /// Instance name within the configuration
    pub name: String,

    /// Raw declarative attributes
    pub attributes: serde_yaml::Value,
}

impl ResourceRequest {
    pub fn new(name: impl Into<String>, attributes: serde_yaml::Value) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }
}

/// Failure of a single resource operation
#[derive(thiserror::Error, Debug)]
pub enum ResourceError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("unknown resource type {0}")]
    UnknownType(String),
}

/// Lifecycle of one resource type
#[async_trait]
pub trait Resource: Send + Sync {
    /// Resource type name
    fn type_name(&self) -> &str;

    /// Kind rendered by this resource type
    fn kind(&self) -> &ResourceKind;

    /// Render the manifest for a declaration without side effects
    fn render(&self, request: &ResourceRequest) -> Result<Projection, ResourceError>;

    /// Render a new instance
    async fn create(&self, request: &ResourceRequest) -> Result<ResourceState, ResourceError>;

    /// Return the stored instance unchanged
    async fn read(&self, prior: &ResourceState) -> Result<ResourceState, ResourceError>;

    /// Render an existing instance again from its current declaration
    async fn update(
        &self,
        request: &ResourceRequest,
        prior: &ResourceState,
    ) -> Result<ResourceState, ResourceError>;

    /// Forget an instance; the host drops the state entry
    async fn delete(&self, prior: &ResourceState) -> Result<(), ResourceError>;
}
