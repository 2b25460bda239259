//! CRD parser implementation

use crate::error::{CatalogError, Result};
use crate::schema::{ResourceKind, RESERVED_TOP_LEVEL};
use crate::types::{find_declarative, FieldSpec, FieldType, Scope, ValidationRules};
use glob::Pattern;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct CrdParser;

impl Default for CrdParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CrdParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse CRDs from a directory, applying filters
    pub fn parse_from_directory(
        &self,
        dir_path: &Path,
        filters: &[String],
    ) -> Result<Vec<ResourceKind>> {
        info!("Parsing CRDs from directory: {:?}", dir_path);

        let mut kinds = Vec::new();

        for entry in WalkDir::new(dir_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();

            match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml") | Some("yml") => {}
                _ => continue,
            }

            match self.parse_file(path) {
                Ok(mut parsed) => {
                    parsed.retain(|kind| self.matches_filters(kind, filters));
                    kinds.extend(parsed);
                }
                Err(e) => {
                    debug!("Failed to parse {} as CRD: {}", path.display(), e);
                }
            }
        }

        info!("Found {} resource kinds after filtering", kinds.len());
        Ok(kinds)
    }

    /// Parse every CRD document in a single file
    pub fn parse_file(&self, path: &Path) -> Result<Vec<ResourceKind>> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut kinds = self.parse_str(&content)?;
        for kind in &mut kinds {
            kind.source_path = Some(path.to_path_buf());
        }
        Ok(kinds)
    }

    /// Parse every CRD document in a (possibly multi-document) YAML string
    pub fn parse_str(&self, content: &str) -> Result<Vec<ResourceKind>> {
        let mut kinds = Vec::new();

        for document in serde_yaml::Deserializer::from_str(content) {
            let doc = Value::deserialize(document)?;
            if let Some(kind) = self.extract_kind_from_document(&doc)? {
                kinds.push(kind);
            }
        }

        Ok(kinds)
    }

    /// Extract a resource kind from a YAML document, if it is a CRD
    fn extract_kind_from_document(&self, doc: &Value) -> Result<Option<ResourceKind>> {
        match doc.get("kind").and_then(|k| k.as_str()) {
            Some("CustomResourceDefinition") => {}
            _ => return Ok(None),
        }

        let name = doc
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(|n| n.as_str())
            .ok_or_else(|| CatalogError::malformed("<unnamed>", "missing metadata.name"))?;

        let spec = doc
            .get("spec")
            .ok_or_else(|| CatalogError::malformed(name, "missing spec"))?;

        let group = spec
            .get("group")
            .and_then(|g| g.as_str())
            .ok_or_else(|| CatalogError::malformed(name, "missing spec.group"))?;

        let kind = spec
            .get("names")
            .and_then(|n| n.get("kind"))
            .and_then(|k| k.as_str())
            .ok_or_else(|| CatalogError::malformed(name, "missing spec.names.kind"))?;

        let scope = match spec.get("scope").and_then(|s| s.as_str()) {
            Some("Cluster") => Scope::Cluster,
            _ => Scope::Namespaced,
        };

        let versions = spec
            .get("versions")
            .and_then(|v| v.as_sequence())
            .ok_or_else(|| CatalogError::malformed(name, "missing spec.versions"))?;

        let version_doc = select_version(versions)
            .ok_or_else(|| CatalogError::malformed(name, "spec.versions is empty"))?;

        let version = version_doc
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| CatalogError::malformed(name, "version missing name"))?;

        let schema = version_doc
            .get("schema")
            .and_then(|s| s.get("openAPIV3Schema"))
            .ok_or_else(|| CatalogError::malformed(name, "version missing openAPIV3Schema"))?;

        let fields = self.object_fields(name, "", schema, &RESERVED_TOP_LEVEL)?;
        debug!("Parsed CRD {} ({}/{}) with {} body fields", name, group, version, fields.len());

        Ok(Some(ResourceKind {
            name: name.to_string(),
            group: group.to_string(),
            version: version.to_string(),
            api_version: format!("{group}/{version}"),
            kind: kind.to_string(),
            scope,
            fields,
            source_path: None,
        }))
    }

    /// Build the field list of an object schema
    fn object_fields(
        &self,
        crd: &str,
        path: &str,
        schema: &Value,
        skip: &[&str],
    ) -> Result<Vec<FieldSpec>> {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(|r| r.as_sequence())
            .map(|seq| seq.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        let mut fields: Vec<FieldSpec> = Vec::new();

        let Some(properties) = schema.get("properties").and_then(|p| p.as_mapping()) else {
            return Ok(fields);
        };

        for (key, value) in properties {
            let Some(manifest_name) = key.as_str() else {
                continue;
            };
            if skip.contains(&manifest_name) {
                continue;
            }

            let field_path = if path.is_empty() {
                manifest_name.to_string()
            } else {
                format!("{path}.{manifest_name}")
            };

            let field_type = self.field_type(crd, &field_path, value)?;
            let mut field = FieldSpec::new(manifest_name, field_type)
                .with_rules(self.extract_validation_rules(value));
            field.required = required.contains(&manifest_name);

            if let Some(existing) = find_declarative(&fields, &field.declarative_name) {
                return Err(CatalogError::NameCollision {
                    crd: crd.to_string(),
                    path: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
                    first: existing.manifest_name.clone(),
                    second: field.manifest_name,
                    declarative: field.declarative_name,
                });
            }

            fields.push(field);
        }

        Ok(fields)
    }

    /// Determine the field type of a property schema
    fn field_type(&self, crd: &str, path: &str, schema: &Value) -> Result<FieldType> {
        if flag(schema, "x-kubernetes-int-or-string") {
            return Ok(FieldType::Dynamic);
        }

        let has_properties = schema
            .get("properties")
            .and_then(|p| p.as_mapping())
            .is_some_and(|p| !p.is_empty());

        match schema.get("type").and_then(|t| t.as_str()) {
            Some("string") => Ok(FieldType::String),
            Some("integer") => Ok(FieldType::Integer),
            Some("number") => Ok(FieldType::Number),
            Some("boolean") => Ok(FieldType::Boolean),
            Some("array") => match schema.get("items") {
                Some(items) => Ok(FieldType::List {
                    items: Box::new(self.field_type(crd, &format!("{path}[]"), items)?),
                    item_rules: self.extract_validation_rules(items),
                }),
                None => Ok(FieldType::list_of(FieldType::Dynamic)),
            },
            Some("object") | None if has_properties => Ok(FieldType::Object {
                fields: self.object_fields(crd, path, schema, &[])?,
            }),
            Some("object") => {
                let string_values = schema
                    .get("additionalProperties")
                    .and_then(|a| a.get("type"))
                    .and_then(|t| t.as_str())
                    == Some("string");
                if string_values {
                    Ok(FieldType::StringMap)
                } else {
                    Ok(FieldType::Dynamic)
                }
            }
            None => Ok(FieldType::Dynamic),
            Some(other) => Err(CatalogError::malformed(
                crd,
                format!("unsupported type {other:?} at {path}"),
            )),
        }
    }

    /// Extract validation rules from OpenAPI schema
    fn extract_validation_rules(&self, schema: &Value) -> ValidationRules {
        let mut rules = ValidationRules::default();

        if let Some(min_length) = schema.get("minLength").and_then(|v| v.as_u64()) {
            rules.min_length = Some(min_length as usize);
        }

        if let Some(max_length) = schema.get("maxLength").and_then(|v| v.as_u64()) {
            rules.max_length = Some(max_length as usize);
        }

        if let Some(pattern) = schema.get("pattern").and_then(|v| v.as_str()) {
            rules.pattern = Some(pattern.to_string());
        }

        if let Some(minimum) = schema.get("minimum").and_then(|v| v.as_f64()) {
            rules.minimum = Some(minimum);
        }

        if let Some(maximum) = schema.get("maximum").and_then(|v| v.as_f64()) {
            rules.maximum = Some(maximum);
        }

        rules.exclusive_minimum = flag(schema, "exclusiveMinimum");
        rules.exclusive_maximum = flag(schema, "exclusiveMaximum");

        if let Some(min_items) = schema.get("minItems").and_then(|v| v.as_u64()) {
            rules.min_items = Some(min_items as usize);
        }

        if let Some(max_items) = schema.get("maxItems").and_then(|v| v.as_u64()) {
            rules.max_items = Some(max_items as usize);
        }

        if let Some(enum_values) = schema.get("enum").and_then(|v| v.as_sequence()) {
            rules.enum_values = enum_values
                .iter()
                .filter_map(enum_member)
                .collect();
        }

        if let Some(format) = schema.get("format").and_then(|v| v.as_str()) {
            rules.format = Some(format.to_string());
        }

        if let Some(description) = schema.get("description").and_then(|v| v.as_str()) {
            rules.description = Some(description.to_string());
        }

        rules
    }

    /// Check if a resource kind matches the given filters
    pub fn matches_filters(&self, kind: &ResourceKind, filters: &[String]) -> bool {
        if filters.is_empty() {
            return true;
        }

        filters.iter().any(|filter| self.matches_filter(kind, filter))
    }

    /// Check if a resource kind matches a specific glob pattern on its API version
    fn matches_filter(&self, kind: &ResourceKind, filter: &str) -> bool {
        match Pattern::new(filter) {
            Ok(pattern) => pattern.matches(&kind.api_version),
            Err(_) => false,
        }
    }
}

/// Pick the storage version, else the first served one, else the first listed
fn select_version(versions: &[Value]) -> Option<&Value> {
    versions
        .iter()
        .find(|v| flag(v, "storage"))
        .or_else(|| versions.iter().find(|v| flag(v, "served")))
        .or_else(|| versions.first())
}

/// Scalar enum member in its canonical text form
fn enum_member(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag(schema: &Value, key: &str) -> bool {
    schema.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::find_manifest;

    const EXAMPLE_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: examples.example.com
spec:
  group: example.com
  scope: Cluster
  names:
    kind: Example
    plural: examples
  versions:
    - name: v1alpha1
      served: true
      storage: false
      schema:
        openAPIV3Schema:
          type: object
    - name: v1beta1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            apiVersion:
              type: string
            kind:
              type: string
            metadata:
              type: object
            spec:
              type: object
              required: [targetName]
              properties:
                targetName:
                  type: string
                  minLength: 1
                replicaCount:
                  type: integer
                  format: int32
                  minimum: 0
                selector:
                  type: object
                  additionalProperties:
                    type: string
                template:
                  type: object
                  x-kubernetes-preserve-unknown-fields: true
                port:
                  x-kubernetes-int-or-string: true
                tags:
                  type: array
                  items:
                    type: string
            status:
              type: object
"#;

    fn test_kind(api_version: &str) -> ResourceKind {
        ResourceKind {
            name: "tests.test.example.com".to_string(),
            group: "test.example.com".to_string(),
            version: "v1".to_string(),
            api_version: api_version.to_string(),
            kind: "TestResource".to_string(),
            scope: Scope::Namespaced,
            fields: Vec::new(),
            source_path: None,
        }
    }

    #[test]
    fn test_filter_matching() {
        let parser = CrdParser::new();
        let kind = test_kind("test.example.com/v1");

        assert!(parser.matches_filter(&kind, "test.example.com/v1"));
        assert!(parser.matches_filter(&kind, "test.example.com/*"));
        assert!(!parser.matches_filter(&kind, "other.example.com/v1"));
    }

    #[test]
    fn test_empty_filters() {
        let parser = CrdParser::new();
        assert!(parser.matches_filters(&test_kind("test.example.com/v1"), &[]));
    }

    #[test]
    fn test_parse_selects_storage_version() {
        let kinds = CrdParser::new().parse_str(EXAMPLE_CRD).unwrap();
        assert_eq!(kinds.len(), 1);

        let kind = &kinds[0];
        assert_eq!(kind.api_version, "example.com/v1beta1");
        assert_eq!(kind.kind, "Example");
        assert_eq!(kind.scope, Scope::Cluster);
        // apiVersion, kind, metadata and status are not body fields
        assert_eq!(kind.fields.len(), 1);
        assert_eq!(kind.fields[0].manifest_name, "spec");
    }

    #[test]
    fn test_parse_field_types() {
        let kinds = CrdParser::new().parse_str(EXAMPLE_CRD).unwrap();
        let spec = kinds[0].field("spec").unwrap();
        let fields = spec.field_type.fields().unwrap();

        let target = find_manifest(fields, "targetName").unwrap();
        assert_eq!(target.declarative_name, "target_name");
        assert!(target.required);
        assert_eq!(target.rules.min_length, Some(1));

        let replicas = find_manifest(fields, "replicaCount").unwrap();
        assert_eq!(replicas.field_type, FieldType::Integer);
        assert!(!replicas.required);
        assert_eq!(replicas.rules.minimum, Some(0.0));

        assert_eq!(find_manifest(fields, "selector").unwrap().field_type, FieldType::StringMap);
        assert_eq!(find_manifest(fields, "template").unwrap().field_type, FieldType::Dynamic);
        assert_eq!(find_manifest(fields, "port").unwrap().field_type, FieldType::Dynamic);
        assert_eq!(
            find_manifest(fields, "tags").unwrap().field_type,
            FieldType::list_of(FieldType::String)
        );
    }

    #[test]
    fn test_non_crd_documents_are_skipped() {
        let content = format!(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: other\n---\n{EXAMPLE_CRD}"
        );
        let kinds = CrdParser::new().parse_str(&content).unwrap();
        assert_eq!(kinds.len(), 1);
    }

    #[test]
    fn test_name_collision_is_rejected() {
        let crd = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: clashes.example.com
spec:
  group: example.com
  names:
    kind: Clash
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                fooBar:
                  type: string
                foo_bar:
                  type: string
"#;
        let err = CrdParser::new().parse_str(crd).unwrap_err();
        match err {
            CatalogError::NameCollision {
                path, declarative, ..
            } => {
                assert_eq!(path, "spec");
                assert_eq!(declarative, "foo_bar");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validation_rules_extraction() {
        let parser = CrdParser::new();
        let schema_value = serde_yaml::from_str(
            r#"
            type: string
            minLength: 1
            maxLength: 100
            pattern: "^[a-zA-Z0-9-]+$"
            description: "A test field"
            enum: ["value1", "value2", "value3"]
        "#,
        )
        .unwrap();

        let rules = parser.extract_validation_rules(&schema_value);

        assert_eq!(rules.min_length, Some(1));
        assert_eq!(rules.max_length, Some(100));
        assert_eq!(rules.pattern, Some("^[a-zA-Z0-9-]+$".to_string()));
        assert_eq!(rules.description, Some("A test field".to_string()));
        assert_eq!(rules.enum_values, vec!["value1", "value2", "value3"]);
    }

    #[test]
    fn test_scalar_enum_members_are_kept() {
        let parser = CrdParser::new();
        let integer: Value = serde_yaml::from_str("type: integer\nenum: [1, 2]").unwrap();
        let number: Value = serde_yaml::from_str("type: number\nenum: [0.5]").unwrap();
        let boolean: Value = serde_yaml::from_str("type: boolean\nenum: [true]").unwrap();

        assert_eq!(parser.extract_validation_rules(&integer).enum_values, vec!["1", "2"]);
        assert_eq!(parser.extract_validation_rules(&number).enum_values, vec!["0.5"]);
        assert_eq!(parser.extract_validation_rules(&boolean).enum_values, vec!["true"]);
    }

    #[test]
    fn test_parse_from_directory_applies_filters() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("example.yaml"), EXAMPLE_CRD).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not yaml").unwrap();
        std::fs::write(dir.path().join("broken.yml"), "kind: [unclosed").unwrap();

        let parser = CrdParser::new();
        let all = parser.parse_from_directory(dir.path(), &[]).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].source_path.is_some());

        let filtered = parser
            .parse_from_directory(dir.path(), &["other.com/*".to_string()])
            .unwrap();
        assert!(filtered.is_empty());
    }
}
