//! Catalog-driven manifest resource

use super::{Resource, ResourceError, ResourceRequest};
use async_trait::async_trait;
use manifest_catalog::ResourceKind;
use manifest_projector::{Clock, Projection, Projector, Validator};
use manifest_state::ResourceState;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared clock handle for every resource of one provider
pub type SharedClock = Arc<dyn Clock>;

/// Resource whose outputs are the rendered manifest of one kind
pub struct ManifestResource {
    type_name: String,
    kind: ResourceKind,
    projector: Projector<SharedClock>,
}

impl ManifestResource {
    pub fn new(type_name: impl Into<String>, kind: ResourceKind, clock: SharedClock) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            projector: Projector::with_clock(clock),
        }
    }

    fn to_state(&self, request: &ResourceRequest, projection: Projection) -> ResourceState {
        ResourceState::new(
            self.type_name.clone(),
            request.name.clone(),
            request.attributes.clone(),
            projection.id,
            projection.manifest.api_version,
            projection.manifest.kind,
            projection.yaml,
        )
    }
}

#[async_trait]
impl Resource for ManifestResource {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    fn render(&self, request: &ResourceRequest) -> Result<Projection, ResourceError> {
        let input = Validator::new(&self.kind).validate(&request.attributes)?;
        let projection = self.projector.project(&self.kind, &input)?;
        debug!(
            "Rendered {}.{} as {}/{}",
            self.type_name,
            request.name,
            projection.api_version(),
            projection.kind()
        );
        Ok(projection)
    }

    async fn create(&self, request: &ResourceRequest) -> Result<ResourceState, ResourceError> {
        let projection = self.render(request)?;
        info!("Created {}.{}", self.type_name, request.name);
        Ok(self.to_state(request, projection))
    }

    async fn read(&self, prior: &ResourceState) -> Result<ResourceState, ResourceError> {
        Ok(prior.clone())
    }

    async fn update(
        &self,
        request: &ResourceRequest,
        _prior: &ResourceState,
    ) -> Result<ResourceState, ResourceError> {
        let projection = self.render(request)?;
        info!("Updated {}.{}", self.type_name, request.name);
        Ok(self.to_state(request, projection))
    }

    async fn delete(&self, prior: &ResourceState) -> Result<(), ResourceError> {
        info!("Deleted {}", prior.address());
        Ok(())
    }
}
