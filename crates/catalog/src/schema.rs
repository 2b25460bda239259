//! Resource kind definition and implementation

use crate::naming;
use crate::types::{find_declarative, FieldSpec, FieldType, Scope, ValidationRules};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level manifest keys that are never part of a kind's body
pub const RESERVED_TOP_LEVEL: [&str; 4] = ["apiVersion", "kind", "metadata", "status"];

/// One resource kind with its full field catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceKind {
    /// CRD name (e.g. `alertmanagerconfigs.monitoring.coreos.com`)
    pub name: String,

    /// API group
    pub group: String,

    /// API version
    pub version: String,

    /// Full API version (group/version)
    pub api_version: String,

    /// Resource kind (from spec.names.kind)
    pub kind: String,

    /// Namespaced or cluster-scoped
    pub scope: Scope,

    /// Body fields (everything besides apiVersion, kind, metadata, status)
    pub fields: Vec<FieldSpec>,

    /// Source file path, if loaded from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl ResourceKind {
    /// Get the kind name (from spec.names.kind)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Resource type name under the given prefix
    pub fn type_name(&self, prefix: &str) -> String {
        naming::type_name(prefix, &self.group, &self.kind, &self.version)
    }

    pub fn is_namespaced(&self) -> bool {
        self.scope.is_namespaced()
    }

    /// Look up a body field by its declarative name
    pub fn field(&self, declarative_name: &str) -> Option<&FieldSpec> {
        find_declarative(&self.fields, declarative_name)
    }

    /// Metadata catalog shared by every kind
    pub fn metadata_fields(&self) -> Vec<FieldSpec> {
        let name_rules = ValidationRules {
            min_length: Some(1),
            ..Default::default()
        };

        let mut fields = vec![FieldSpec::new("name", FieldType::String)
            .required()
            .with_rules(name_rules)];
        if self.is_namespaced() {
            fields.push(FieldSpec::new("namespace", FieldType::String));
        }
        fields.push(FieldSpec::new("labels", FieldType::StringMap));
        fields.push(FieldSpec::new("annotations", FieldType::StringMap));
        fields
    }

    /// Total number of fields in the catalog, nested ones included
    pub fn field_count(&self) -> usize {
        fn count(fields: &[FieldSpec]) -> usize {
            fields
                .iter()
                .map(|f| 1 + nested(&f.field_type))
                .sum()
        }
        fn nested(field_type: &FieldType) -> usize {
            match field_type {
                FieldType::Object { fields } => count(fields),
                FieldType::List { items, .. } => nested(items),
                _ => 0,
            }
        }
        count(&self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_kind(scope: Scope) -> ResourceKind {
        ResourceKind {
            name: "examples.example.com".to_string(),
            group: "example.com".to_string(),
            version: "v1alpha1".to_string(),
            api_version: "example.com/v1alpha1".to_string(),
            kind: "Example".to_string(),
            scope,
            fields: vec![FieldSpec::new(
                "spec",
                FieldType::Object {
                    fields: vec![
                        FieldSpec::new("replicaCount", FieldType::Integer),
                        FieldSpec::new(
                            "ports",
                            FieldType::list_of(FieldType::Object {
                                fields: vec![FieldSpec::new("port", FieldType::Integer)],
                            }),
                        ),
                    ],
                },
            )],
            source_path: None,
        }
    }

    #[test]
    fn test_resource_kind_type_name() {
        let kind = example_kind(Scope::Namespaced);
        assert_eq!(kind.kind(), "Example");
        assert_eq!(kind.type_name("k8s"), "k8s_example_com_example_v1alpha1");
    }

    #[test]
    fn test_metadata_fields_follow_scope() {
        let namespaced = example_kind(Scope::Namespaced).metadata_fields();
        assert!(find_declarative(&namespaced, "namespace").is_some());
        assert!(find_declarative(&namespaced, "name").unwrap().required);

        let cluster = example_kind(Scope::Cluster).metadata_fields();
        assert!(find_declarative(&cluster, "namespace").is_none());
        assert_eq!(cluster.len(), 3);
    }

    #[test]
    fn test_field_count_includes_nested() {
        assert_eq!(example_kind(Scope::Namespaced).field_count(), 4);
    }
}
