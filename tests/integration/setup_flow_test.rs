use std::path::Path;
use std::process::Output;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PUBLISHER_ID: &str = "pub-9876543210";

async fn admob_stats(args: &[&str], home: &Path, server: &MockServer) -> Output {
    Command::new(env!("CARGO_BIN_EXE_admob-stats"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env(
            "ADMOB_STATS_STORAGE__ENTRIES_PATH",
            home.join("entries.toml"),
        )
        .env("ADMOB_STATS_API__BASE_URL", server.uri())
        .env("ADMOB_STATS_API__TOKEN_URL", format!("{}/token", server.uri()))
        .env_remove("RUST_LOG")
        .env_remove("ADMOB_STATS_LOG_LEVEL")
        .env_remove("ADMOB_CLIENT_ID")
        .env_remove("ADMOB_CLIENT_SECRET")
        .env_remove("ADMOB_REFRESH_TOKEN")
        .env_remove("ADMOB_PUBLISHER_ID")
        .current_dir(home)
        .output()
        .await
        .expect("Failed to execute admob-stats")
}

fn setup_args() -> Vec<&'static str> {
    vec![
        "setup",
        "--client-id",
        "client.apps.googleusercontent.com",
        "--client-secret",
        "secret",
        "--refresh-token",
        "1//refresh",
        "--publisher-id",
        PUBLISHER_ID,
    ]
}

async fn mount_api(server: &MockServer, token_status: u16) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(token_status).set_body_json(json!({
            "access_token": "ya29.cli",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{}", PUBLISHER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!("accounts/{}", PUBLISHER_ID),
            "publisherId": PUBLISHER_ID,
            "currencyCode": "USD"
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/accounts/{}/networkReport:generate",
            PUBLISHER_ID
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"header": {"localizationSettings": {"currencyCode": "USD"}}},
            {"row": {
                "dimensionValues": {"DATE": {"value": "20240315"}},
                "metricValues": {
                    "ESTIMATED_EARNINGS": {"microsValue": "7250000"},
                    "IMPRESSIONS": {"integerValue": "3100"},
                    "AD_REQUESTS": {"integerValue": "4000"},
                    "CLICKS": {"integerValue": "41"}
                }
            }},
            {"footer": {"matchingRowCount": "1"}}
        ])))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_setup_then_stats_and_sensors() {
    let server = MockServer::start().await;
    mount_api(&server, 200).await;
    let home = TempDir::new().unwrap();

    let output = admob_stats(&setup_args(), home.path(), &server).await;
    assert!(
        output.status.success(),
        "setup failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains(&format!("AdMob ({})", PUBLISHER_ID)));

    let output = admob_stats(&["entries", "list", "--format", "json"], home.path(), &server).await;
    let entries: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["publisher_id"], PUBLISHER_ID);
    assert!(entries[0].get("client_secret").is_none());

    let output = admob_stats(&["stats", "--format", "json"], home.path(), &server).await;
    assert!(output.status.success());
    let stats: Value = serde_json::from_slice(&output.stdout).unwrap();
    let today = &stats[0]["snapshot"]["periods"]["today"];
    assert_eq!(today["earnings"], 7.25);
    assert_eq!(today["clicks"], 41);

    let output = admob_stats(&["sensors", "--format", "json"], home.path(), &server).await;
    assert!(output.status.success());
    let sensors: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(sensors[0]["available"], true);
    assert_eq!(sensors[0]["sensors"].as_array().unwrap().len(), 16);

    let output = admob_stats(&setup_args(), home.path(), &server).await;
    assert!(!output.status.success(), "second setup should abort");
    assert!(String::from_utf8_lossy(&output.stdout).contains("already configured"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_setup_with_rejected_credentials() {
    let server = MockServer::start().await;
    mount_api(&server, 401).await;
    let home = TempDir::new().unwrap();

    let output = admob_stats(&setup_args(), home.path(), &server).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Failed to connect"));
    assert!(!home.path().join("entries.toml").exists());
}
