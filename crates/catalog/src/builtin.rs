//! CRDs embedded in the binary

use crate::error::Result;
use crate::parser::CrdParser;
use crate::schema::ResourceKind;

/// Embedded CRD documents as (file name, content)
pub const BUILTIN_CRDS: &[(&str, &str)] = &[
    (
        "monitoring.coreos.com_alertmanagerconfigs.yaml",
        include_str!("../crds/monitoring.coreos.com_alertmanagerconfigs.yaml"),
    ),
    (
        "flows.knative.dev_sequences.yaml",
        include_str!("../crds/flows.knative.dev_sequences.yaml"),
    ),
];

/// Parse every embedded CRD
pub fn kinds() -> Result<Vec<ResourceKind>> {
    let parser = CrdParser::new();
    let mut kinds = Vec::new();
    for (_, content) in BUILTIN_CRDS {
        kinds.extend(parser.parse_str(content)?);
    }
    Ok(kinds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{find_manifest, FieldType};
    use std::collections::HashSet;

    fn assert_one_to_one(path: &str, fields: &[crate::FieldSpec]) {
        let declarative: HashSet<_> = fields.iter().map(|f| &f.declarative_name).collect();
        let manifest: HashSet<_> = fields.iter().map(|f| &f.manifest_name).collect();
        assert_eq!(declarative.len(), fields.len(), "collision at {path}");
        assert_eq!(manifest.len(), fields.len(), "duplicate at {path}");

        for field in fields {
            let mut field_type = &field.field_type;
            while let FieldType::List { items, .. } = field_type {
                field_type = items;
            }
            if let FieldType::Object { fields } = field_type {
                assert_one_to_one(&format!("{path}.{}", field.manifest_name), fields);
            }
        }
    }

    #[test]
    fn test_builtin_kinds_parse() {
        let kinds = kinds().unwrap();
        let api_versions: Vec<_> = kinds.iter().map(|k| k.api_version.as_str()).collect();
        assert_eq!(
            api_versions,
            vec!["monitoring.coreos.com/v1alpha1", "flows.knative.dev/v1"]
        );
    }

    #[test]
    fn test_builtin_name_tables_are_one_to_one() {
        for kind in kinds().unwrap() {
            assert_one_to_one(&kind.kind, &kind.fields);
        }
    }

    #[test]
    fn test_alertmanager_config_catalog() {
        let kinds = kinds().unwrap();
        let amcfg = kinds.iter().find(|k| k.kind == "AlertmanagerConfig").unwrap();
        let spec = amcfg.field("spec").unwrap().field_type.fields().unwrap();

        let receivers = find_manifest(spec, "receivers").unwrap();
        let FieldType::List { items, .. } = &receivers.field_type else {
            panic!("receivers should be a list");
        };
        let receiver = items.fields().unwrap();
        assert!(find_manifest(receiver, "name").unwrap().required);

        let email = find_manifest(receiver, "emailConfigs").unwrap();
        let FieldType::List { items, .. } = &email.field_type else {
            panic!("emailConfigs should be a list");
        };
        let require_tls = find_manifest(items.fields().unwrap(), "requireTLS").unwrap();
        assert_eq!(require_tls.declarative_name, "require_tls");
    }
}
