mod common;

use std::sync::Arc;
use std::time::Duration;

use admob_stats_core::{
    admob_source_factory, Button, ConfigEntryStore, ConfigFlow, CoordinatorConfig, FlowResult,
    IntegrationRegistry, MetricValue, Sensor, DOMAIN,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

fn store(dir: &TempDir) -> Arc<ConfigEntryStore> {
    Arc::new(ConfigEntryStore::new(dir.path().join("entries.toml")))
}

#[tokio::test]
async fn test_flow_creates_and_persists_entry() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_account(&server).await;

    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let flow = ConfigFlow::new(store.clone(), admob_source_factory(api_config(&server)));

    let result = flow.step_user(Some(credentials())).await.unwrap();
    let entry = result.entry().expect("entry created").clone();
    assert_eq!(entry.title, format!("AdMob ({})", PUBLISHER_ID));

    let reopened = ConfigEntryStore::new(store.path());
    let persisted = reopened.get(&entry.entry_id).await.unwrap();
    assert_eq!(persisted.data, credentials());
}

#[tokio::test]
async fn test_flow_rejected_credentials_show_cannot_connect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let flow = ConfigFlow::new(store.clone(), admob_source_factory(api_config(&server)));

    match flow.step_user(Some(credentials())).await.unwrap() {
        FlowResult::ShowForm { step_id, errors, .. } => {
            assert_eq!(step_id, "user");
            assert_eq!(errors.get("base").map(String::as_str), Some("cannot_connect"));
        }
        other => panic!("expected form, got {:?}", other),
    }
    assert!(store.list().await.unwrap().is_empty());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_entry_lifecycle_end_to_end() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_account(&server).await;
    Mock::given(method("POST"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(report(vec![
            row("20240315", "4200000", "800", "900", "12"),
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let factory = admob_source_factory(api_config(&server));
    let flow = ConfigFlow::new(store(&dir), factory.clone());
    let entry = flow
        .step_user(Some(credentials()))
        .await
        .unwrap()
        .entry()
        .cloned()
        .unwrap();

    let registry = IntegrationRegistry::new(
        factory,
        CoordinatorConfig {
            update_interval: Duration::from_secs(1800),
            refresh_cooldown: Duration::from_secs(0),
        },
    );
    let runtime = registry.setup_entry(entry.clone()).await.unwrap();

    assert_eq!(runtime.sensors.len(), 16);
    let earnings = runtime.sensor("admob_this_month_earnings").unwrap();
    assert_eq!(earnings.native_value(), Some(MetricValue::Currency(4.2)));
    assert_eq!(
        earnings.extra_state_attributes().get("clicks"),
        Some(&MetricValue::Count(12))
    );

    runtime.button.press().await;
    assert_eq!(runtime.coordinator.state().refresh_count, 2);

    registry.unload_entry(DOMAIN, &entry.entry_id).await.unwrap();
    assert!(registry.is_empty().await);
}
