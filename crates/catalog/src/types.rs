//! Field catalog types and data structures

use serde::{Deserialize, Serialize};

/// Validation rules extracted from OpenAPI schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ValidationRules {
    /// Minimum length for strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Maximum length for strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Pattern for strings (regex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Minimum value for numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Maximum value for numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Exclusive minimum
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_minimum: bool,

    /// Exclusive maximum
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_maximum: bool,

    /// Minimum number of list items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    /// Maximum number of list items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    /// Enum values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    /// Format (e.g., "date-time", "int32")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ValidationRules {
    /// True when no rule constrains the value
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.min_items.is_none()
            && self.max_items.is_none()
            && self.enum_values.is_empty()
    }
}

/// Shape of a catalog field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,

    /// Label/annotation-style map of string to string
    StringMap,

    /// Nested object with a fixed set of fields
    Object { fields: Vec<FieldSpec> },

    /// Ordered sequence of values of one type
    List {
        items: Box<FieldType>,
        #[serde(default, skip_serializing_if = "ValidationRules::is_empty")]
        item_rules: ValidationRules,
    },

    /// Free-form value whose shape is not fixed by the schema
    Dynamic,
}

impl FieldType {
    /// Short human readable name used in messages and schema listings
    pub fn label(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Integer => "integer".to_string(),
            FieldType::Number => "number".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::StringMap => "map(string)".to_string(),
            FieldType::Object { .. } => "object".to_string(),
            FieldType::List { items, .. } => format!("list({})", items.label()),
            FieldType::Dynamic => "dynamic".to_string(),
        }
    }

    /// List of the given item type without item rules
    pub fn list_of(items: FieldType) -> Self {
        FieldType::List {
            items: Box::new(items),
            item_rules: ValidationRules::default(),
        }
    }

    /// Nested fields for object types
    pub fn fields(&self) -> Option<&[FieldSpec]> {
        match self {
            FieldType::Object { fields } => Some(fields),
            _ => None,
        }
    }
}

/// One entry of a field catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    /// Name in the manifest (camelCase, as in the upstream API)
    pub manifest_name: String,

    /// Name in the declarative model (snake_case)
    pub declarative_name: String,

    /// Whether the upstream schema marks the field required
    #[serde(default)]
    pub required: bool,

    /// Field type
    pub field_type: FieldType,

    /// Primitive validation rules
    #[serde(default, skip_serializing_if = "ValidationRules::is_empty")]
    pub rules: ValidationRules,
}

impl FieldSpec {
    /// Create a field whose declarative name is derived from the manifest name
    pub fn new(manifest_name: impl Into<String>, field_type: FieldType) -> Self {
        let manifest_name = manifest_name.into();
        Self {
            declarative_name: crate::naming::to_snake_case(&manifest_name),
            manifest_name,
            required: false,
            field_type,
            rules: ValidationRules::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }
}

/// Whether a kind lives inside a namespace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Namespaced,
    Cluster,
}

impl Scope {
    pub fn is_namespaced(self) -> bool {
        self == Scope::Namespaced
    }
}

/// Look up a field by its declarative name
pub fn find_declarative<'a>(fields: &'a [FieldSpec], name: &str) -> Option<&'a FieldSpec> {
    fields.iter().find(|f| f.declarative_name == name)
}

/// Look up a field by its manifest name
pub fn find_manifest<'a>(fields: &'a [FieldSpec], name: &str) -> Option<&'a FieldSpec> {
    fields.iter().find(|f| f.manifest_name == name)
}
