//! Configuration tests

use super::*;
use rstest::rstest;
use std::path::PathBuf;
use tempfile::TempDir;

const FULL_CONFIG: &str = r#"
version: "1.0"
provider:
  type_prefix: k8s
  state_path: state/manifests.yaml
  fail_fast: true
catalogs:
  - path: ./crds
    filters: ["monitoring.coreos.com/*"]
resources:
  - type: k8s_flows_knative_dev_sequence_v1
    name: checkout
    attributes:
      metadata: { name: checkout }
"#;

#[test]
fn test_parse_full_config() {
    let config = Config::from_yaml(FULL_CONFIG).unwrap();

    assert_eq!(config.provider.type_prefix, "k8s");
    assert_eq!(config.provider.state_path, PathBuf::from("state/manifests.yaml"));
    assert!(config.provider.include_builtin);
    assert!(config.provider.fail_fast);
    assert_eq!(config.catalogs[0].filters, vec!["monitoring.coreos.com/*"]);
    assert_eq!(
        config.resources[0].address(),
        "k8s_flows_knative_dev_sequence_v1.checkout"
    );
    assert!(config
        .resource("k8s_flows_knative_dev_sequence_v1.checkout")
        .is_some());
}

#[test]
fn test_defaults_apply_to_minimal_config() {
    let config = Config::from_yaml("version: \"1.0\"\n").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(
        config.provider.state_path,
        PathBuf::from("crd-manifests.state.yaml")
    );
}

#[test]
fn test_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("crd-manifests.yaml");

    let config = Config::example().unwrap();
    config.save_to_file(&path).unwrap();
    let reloaded = Config::from_file(&path).unwrap();

    assert_eq!(reloaded, config);
    assert_eq!(reloaded.resources.len(), 1);
}

#[test]
fn test_example_renders_against_builtin_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::example().unwrap();
    assert!(config.resources[0].attributes.is_mapping());

    let provider = crate::Provider::new(config, temp_dir.path()).unwrap();
    for (address, outcome) in provider.validate_resources() {
        assert!(outcome.is_ok(), "{address}: {outcome:?}");
    }
}

#[rstest]
#[case("version: \"2.0\"\n", "Unsupported configuration version")]
#[case(
    "version: \"1.0\"\nprovider: { type_prefix: K8S }\n",
    "Type prefix must be"
)]
#[case(
    "version: \"1.0\"\ncatalogs: [{ path: crds, filters: [\"[\"] }]\n",
    "Invalid catalog filter"
)]
#[case(
    "version: \"1.0\"\nresources: [{ type: k8s_a_v1, name: \"bad.name\" }]\n",
    "Invalid resource name"
)]
#[case(
    "version: \"1.0\"\nresources: [{ type: k8s_a_v1, name: x }, { type: k8s_a_v1, name: x }]\n",
    "Duplicate resource address: k8s_a_v1.x"
)]
fn test_invalid_configs(#[case] yaml: &str, #[case] message: &str) {
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(
        err.to_string().contains(message),
        "unexpected error: {err}"
    );
}

#[test]
fn test_missing_file_has_context() {
    let err = Config::from_file(&PathBuf::from("/nonexistent/crd-manifests.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read configuration file"));
}
