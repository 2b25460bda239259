//! Declarative and manifest models

use crate::value::{DynamicValue, Mapping};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed value in the declarative tree
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    StringMap(BTreeMap<String, String>),
    Object(Attributes),
    List(Vec<AttributeValue>),
    Dynamic(DynamicValue),
}

impl AttributeValue {
    /// Lists and string maps without entries are rendered as absent
    pub fn is_empty_collection(&self) -> bool {
        match self {
            AttributeValue::List(items) => items.is_empty(),
            AttributeValue::StringMap(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Structural conversion that keeps declarative key names
    pub fn to_dynamic(&self) -> DynamicValue {
        match self {
            AttributeValue::String(s) => DynamicValue::String(s.clone()),
            AttributeValue::Integer(i) => DynamicValue::Integer(*i),
            AttributeValue::Number(n) => DynamicValue::Float(*n),
            AttributeValue::Bool(b) => DynamicValue::Bool(*b),
            AttributeValue::StringMap(map) => DynamicValue::Mapping(Mapping::from(map)),
            AttributeValue::Object(attrs) => DynamicValue::Mapping(
                attrs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_dynamic()))
                    .collect(),
            ),
            AttributeValue::List(items) => {
                DynamicValue::Sequence(items.iter().map(AttributeValue::to_dynamic).collect())
            }
            AttributeValue::Dynamic(value) => value.clone(),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<Attributes> for AttributeValue {
    fn from(value: Attributes) -> Self {
        AttributeValue::Object(value)
    }
}

/// Set attributes of one object level, keyed by declarative name
///
/// A name that is not present is absent; there is no null.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Declarative metadata block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclarativeMetadata {
    pub name: String,
    pub namespace: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
    pub annotations: Option<BTreeMap<String, String>>,
}

impl DeclarativeMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// One resource instance in the declarative model
///
/// `id`, `yaml`, `api_version` and `kind` are computed. Values supplied by a
/// caller are kept here but never read by the projector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclarativeResource {
    pub metadata: DeclarativeMetadata,
    pub body: Attributes,
    pub id: Option<i64>,
    pub yaml: Option<String>,
    pub api_version: Option<String>,
    pub kind: Option<String>,
}

impl DeclarativeResource {
    pub fn new(metadata: DeclarativeMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: Attributes) -> Self {
        self.body = body;
        self
    }
}

/// Manifest metadata; absent fields are not serialized
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

/// Kubernetes object manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: ManifestMetadata,

    /// Body fields such as `spec`, in catalog order
    #[serde(flatten)]
    pub body: Mapping,
}

impl Manifest {
    /// Top-level body field by manifest name
    pub fn field(&self, name: &str) -> Option<&DynamicValue> {
        self.body.get(name)
    }
}
