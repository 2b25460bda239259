//! Manifest projection

use crate::clock::{Clock, SystemClock};
use crate::error::ProjectionError;
use crate::model::{AttributeValue, Attributes, DeclarativeResource, Manifest, ManifestMetadata};
use crate::value::{DynamicValue, Mapping};
use manifest_catalog::{FieldSpec, FieldType, ResourceKind};
use tracing::debug;

/// Result of projecting one resource
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub manifest: Manifest,
    pub yaml: String,
    pub id: i64,
}

impl Projection {
    pub fn api_version(&self) -> &str {
        &self.manifest.api_version
    }

    pub fn kind(&self) -> &str {
        &self.manifest.kind
    }

    /// Write the bookkeeping fields into the declarative resource
    pub fn record_into(&self, resource: &mut DeclarativeResource) {
        resource.id = Some(self.id);
        resource.yaml = Some(self.yaml.clone());
        resource.api_version = Some(self.manifest.api_version.clone());
        resource.kind = Some(self.manifest.kind.clone());
    }
}

/// Converts declarative resources into YAML manifests
#[derive(Debug, Default)]
pub struct Projector<C = SystemClock> {
    clock: C,
}

impl Projector<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl<C: Clock> Projector<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Project a declarative resource into its manifest, YAML text and id
    pub fn project(
        &self,
        kind: &ResourceKind,
        input: &DeclarativeResource,
    ) -> Result<Projection, ProjectionError> {
        let manifest = build_manifest(kind, input);
        let yaml = encode(&manifest)?;
        let id = self.clock.now_nanos();

        debug!(
            "Projected {}/{} {} into {} bytes",
            manifest.api_version,
            manifest.kind,
            manifest.metadata.name,
            yaml.len()
        );

        Ok(Projection { manifest, yaml, id })
    }
}

/// Build the manifest tree for a declarative resource
///
/// `apiVersion` and `kind` always come from the kind, never from the input.
pub fn build_manifest(kind: &ResourceKind, input: &DeclarativeResource) -> Manifest {
    let metadata = &input.metadata;

    Manifest {
        api_version: kind.api_version.clone(),
        kind: kind.kind.clone(),
        metadata: ManifestMetadata {
            name: metadata.name.clone(),
            namespace: if kind.is_namespaced() {
                metadata.namespace.clone()
            } else {
                None
            },
            labels: metadata.labels.clone().filter(|m| !m.is_empty()),
            annotations: metadata.annotations.clone().filter(|m| !m.is_empty()),
        },
        body: project_fields(&kind.fields, &input.body),
    }
}

/// Encode a manifest as block-style YAML
pub fn encode(manifest: &Manifest) -> Result<String, ProjectionError> {
    serde_yaml::to_string(manifest).map_err(ProjectionError::Encoding)
}

/// Decode YAML text back into a manifest
pub fn decode(yaml: &str) -> Result<Manifest, ProjectionError> {
    serde_yaml::from_str(yaml).map_err(ProjectionError::Decoding)
}

fn project_fields(fields: &[FieldSpec], attrs: &Attributes) -> Mapping {
    let mut out = Mapping::new();
    for field in fields {
        let Some(value) = attrs.get(&field.declarative_name) else {
            continue;
        };
        if value.is_empty_collection() {
            continue;
        }
        out.insert(field.manifest_name.clone(), project_value(&field.field_type, value));
    }
    out
}

fn project_value(field_type: &FieldType, value: &AttributeValue) -> DynamicValue {
    match (field_type, value) {
        (FieldType::Object { fields }, AttributeValue::Object(attrs)) => {
            DynamicValue::Mapping(project_fields(fields, attrs))
        }
        (FieldType::List { items, .. }, AttributeValue::List(values)) => {
            DynamicValue::Sequence(values.iter().map(|v| project_value(items, v)).collect())
        }
        (_, other) => other.to_dynamic(),
    }
}
