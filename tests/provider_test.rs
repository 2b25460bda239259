use crd_manifests::{Action, Clock, Config, PlanAction, Provider};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

const ALERTMANAGER: &str = "k8s_monitoring_coreos_com_alertmanager_config_v1alpha1";
const SEQUENCE: &str = "k8s_flows_knative_dev_sequence_v1";

/// Clock that advances by one second on every read
#[derive(Default)]
struct TickingClock(AtomicI64);

impl Clock for TickingClock {
    fn now_nanos(&self) -> i64 {
        self.0.fetch_add(1_000_000_000, Ordering::SeqCst) + 1_000_000_000
    }
}

fn config(yaml: &str) -> Config {
    Config::from_yaml(yaml).unwrap()
}

fn provider(dir: &Path, yaml: &str, clock: Arc<TickingClock>) -> Provider {
    Provider::with_clock(config(yaml), dir, clock).unwrap()
}

fn two_resources() -> String {
    format!(
        r#"
resources:
  - type: {ALERTMANAGER}
    name: team_a
    attributes:
      metadata: {{ name: team-a, namespace: monitoring }}
      spec:
        route: {{ receiver: hook }}
        receivers:
          - name: hook
  - type: {SEQUENCE}
    name: checkout
    attributes:
      metadata: {{ name: checkout }}
      spec:
        steps:
          - uri: http://charge.shop.svc
"#
    )
}

#[tokio::test]
async fn test_apply_writes_state_and_restamps_ids() {
    let temp_dir = TempDir::new().unwrap();
    let clock = Arc::new(TickingClock::default());
    let provider = provider(temp_dir.path(), &two_resources(), clock);

    let first = provider.apply().await.unwrap();
    assert!(first.is_success());
    assert_eq!(first.applied.len(), 2);
    assert!(first.applied.iter().all(|a| a.action == Action::Create));
    assert!(temp_dir.path().join("crd-manifests.state.yaml").exists());

    let second = provider.apply().await.unwrap();
    assert!(second.applied.iter().all(|a| a.action == Action::Update));
    for (before, after) in first.applied.iter().zip(&second.applied) {
        assert_eq!(before.address, after.address);
        assert!(after.id > before.id, "id must move forward on every apply");
    }

    let state = provider.state().await.unwrap();
    let entry = state.get(&format!("{SEQUENCE}.checkout")).unwrap();
    assert_eq!(entry.kind, "Sequence");
    assert_eq!(
        entry.yaml,
        "apiVersion: flows.knative.dev/v1\nkind: Sequence\nmetadata:\n  name: checkout\nspec:\n  steps:\n  - uri: http://charge.shop.svc\n"
    );
}

#[tokio::test]
async fn test_plan_detects_unchanged_and_updated_manifests() {
    let temp_dir = TempDir::new().unwrap();
    let clock = Arc::new(TickingClock::default());

    let initial = provider(temp_dir.path(), &two_resources(), clock.clone());
    let plan = initial.plan().await.unwrap();
    assert_eq!(plan.count(PlanAction::Create), 2);
    assert!(!initial.state_path().exists(), "plan must not write state");

    initial.apply().await.unwrap();
    let plan = initial.plan().await.unwrap();
    assert!(plan.is_noop());
    assert_eq!(plan.count(PlanAction::Unchanged), 2);

    let changed = two_resources().replace("http://charge.shop.svc", "http://refund.shop.svc");
    let plan = provider(temp_dir.path(), &changed, clock).plan().await.unwrap();
    let update = plan
        .changes
        .iter()
        .find(|c| c.action == PlanAction::Update)
        .unwrap();
    assert_eq!(update.address, format!("{SEQUENCE}.checkout"));
    assert!(update.yaml.as_deref().unwrap().contains("refund"));
}

#[tokio::test]
async fn test_failed_resource_keeps_prior_state() {
    let temp_dir = TempDir::new().unwrap();
    let clock = Arc::new(TickingClock::default());

    let initial = provider(temp_dir.path(), &two_resources(), clock.clone());
    initial.apply().await.unwrap();
    let prior = initial.state().await.unwrap();

    let broken = two_resources().replace(
        "route: { receiver: hook }",
        "route: { receiver: hook, group_wait: soon }",
    );
    let provider = provider(temp_dir.path(), &broken, clock);
    let result = provider.apply().await.unwrap();

    assert!(!result.is_success());
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].address, format!("{ALERTMANAGER}.team_a"));
    assert!(result.failed[0].error.contains("spec.route.group_wait"));
    assert_eq!(result.applied.len(), 1);

    let state = provider.state().await.unwrap();
    let address = format!("{ALERTMANAGER}.team_a");
    assert_eq!(state.get(&address), prior.get(&address));
    assert_eq!(state.len(), 2);
}

#[tokio::test]
async fn test_fail_fast_saves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let yaml = format!(
        r#"
provider:
  fail_fast: true
resources:
  - type: {SEQUENCE}
    name: broken
    attributes:
      metadata: {{ name: broken }}
      spec: {{ steps: [{{ ref: {{ name: x }} }}] }}
  - type: {SEQUENCE}
    name: fine
    attributes:
      metadata: {{ name: fine }}
"#
    );
    let provider = provider(temp_dir.path(), &yaml, Arc::new(TickingClock::default()));

    let err = provider.apply().await.unwrap_err();
    assert!(err.to_string().contains(&format!("{SEQUENCE}.broken")));
    assert!(!provider.state_path().exists());
}

#[tokio::test]
async fn test_removed_declarations_are_deleted() {
    let temp_dir = TempDir::new().unwrap();
    let clock = Arc::new(TickingClock::default());
    provider(temp_dir.path(), &two_resources(), clock.clone())
        .apply()
        .await
        .unwrap();

    let only_sequence = format!(
        r#"
resources:
  - type: {SEQUENCE}
    name: checkout
    attributes:
      metadata: {{ name: checkout }}
"#
    );
    let provider = provider(temp_dir.path(), &only_sequence, clock);

    let plan = provider.plan().await.unwrap();
    assert_eq!(plan.count(PlanAction::Delete), 1);

    let result = provider.apply().await.unwrap();
    assert_eq!(result.deleted, vec![format!("{ALERTMANAGER}.team_a")]);

    let state = provider.state().await.unwrap();
    assert_eq!(state.addresses(), vec![format!("{SEQUENCE}.checkout")]);
}

#[tokio::test]
async fn test_destroy_clears_state() {
    let temp_dir = TempDir::new().unwrap();
    let provider = provider(
        temp_dir.path(),
        &two_resources(),
        Arc::new(TickingClock::default()),
    );
    provider.apply().await.unwrap();

    let removed = provider.destroy().await.unwrap();
    assert_eq!(removed.len(), 2);
    assert!(provider.state().await.unwrap().is_empty());

    assert!(provider.destroy().await.unwrap().is_empty());
}

#[test]
fn test_render_unknown_address() {
    let temp_dir = TempDir::new().unwrap();
    let provider = Provider::new(config(&two_resources()), temp_dir.path()).unwrap();

    let err = provider.render("k8s_missing_thing_v1.nothing").unwrap_err();
    assert!(err.to_string().contains("No resource declared"));

    let projection = provider.render(&format!("{ALERTMANAGER}.team_a")).unwrap();
    assert_eq!(projection.kind(), "AlertmanagerConfig");
}

#[test]
fn test_unknown_resource_type_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let yaml = r#"
resources:
  - type: k8s_example_com_widget_v1
    name: w
    attributes: { metadata: { name: w } }
"#;
    let err = Provider::new(config(yaml), temp_dir.path()).err().unwrap();
    assert!(err.to_string().contains("Unknown resource type k8s_example_com_widget_v1"));
}

#[test]
fn test_validate_reports_each_resource() {
    let temp_dir = TempDir::new().unwrap();
    let yaml = two_resources().replace("name: checkout }", "name: checkout, namespace: 7 }");
    let provider = Provider::new(config(&yaml), temp_dir.path()).unwrap();

    let outcomes = provider.validate_resources();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].1.is_ok());
    let err = outcomes[1].1.as_ref().unwrap_err().to_string();
    assert!(err.contains("metadata.namespace"), "{err}");
}
