//! Field catalogs for Kubernetes custom resources
//!
//! A catalog entry describes one resource kind: its fixed `apiVersion` and
//! `kind`, its scope and the tree of fields accepted in its body, each with
//! a manifest name, a declarative name, a type and primitive validation rules.
//! Entries are derived from CustomResourceDefinition documents.

pub mod builtin;
pub mod error;
pub mod naming;
pub mod parser;
pub mod registry;
pub mod schema;
pub mod types;

pub use error::CatalogError;
pub use parser::CrdParser;
pub use registry::Catalog;
pub use schema::ResourceKind;
pub use types::{FieldSpec, FieldType, Scope, ValidationRules};
