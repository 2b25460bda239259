//! Declarative to manifest projection
//!
//! The [`Validator`] turns a raw declarative document into a typed
//! [`DeclarativeResource`]; the [`Projector`] converts that tree into a
//! Kubernetes manifest with the kind's fixed `apiVersion` and `kind`, encodes
//! it as YAML and stamps an `id` from its clock.

pub mod clock;
pub mod error;
pub mod model;
pub mod projector;
pub mod validation;
pub mod value;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ProjectionError, ValidationError, ValidationErrors};
pub use model::{
    AttributeValue, Attributes, DeclarativeMetadata, DeclarativeResource, Manifest,
    ManifestMetadata,
};
pub use projector::{build_manifest, decode, encode, Projection, Projector};
pub use validation::Validator;
pub use value::{DynamicValue, Mapping};
