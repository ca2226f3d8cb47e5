#![allow(dead_code)]

use admob_stats_core::{ApiConfig, Credentials};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PUBLISHER_ID: &str = "pub-1234567890";
pub const ACCESS_TOKEN: &str = "ya29.test-token";

pub fn credentials() -> Credentials {
    Credentials::new(
        "client-id.apps.googleusercontent.com",
        "client-secret",
        "1//refresh-token",
        PUBLISHER_ID,
    )
}

pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        token_url: format!("{}/token", server.uri()),
        timeout_secs: 5,
    }
}

pub fn report_path() -> String {
    format!("/v1/accounts/{}/networkReport:generate", PUBLISHER_ID)
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "expires_in": 3599,
            "token_type": "Bearer",
            "scope": "https://www.googleapis.com/auth/admob.report"
        })))
        .mount(server)
        .await;
}

pub async fn mount_account(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{}", PUBLISHER_ID)))
        .and(header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!("accounts/{}", PUBLISHER_ID),
            "publisherId": PUBLISHER_ID,
            "reportingTimeZone": "America/Los_Angeles",
            "currencyCode": "USD"
        })))
        .mount(server)
        .await;
}

fn wire_date(date: (i32, u32, u32)) -> Value {
    json!({"year": date.0, "month": date.1, "day": date.2})
}

/// Matcher body for one report range.
pub fn range_body(start: (i32, u32, u32), end: (i32, u32, u32)) -> Value {
    json!({
        "reportSpec": {
            "dateRange": {
                "startDate": wire_date(start),
                "endDate": wire_date(end)
            }
        }
    })
}

pub fn row(date: &str, micros: &str, impressions: &str, requests: &str, clicks: &str) -> Value {
    json!({
        "row": {
            "dimensionValues": {"DATE": {"value": date}},
            "metricValues": {
                "ESTIMATED_EARNINGS": {"microsValue": micros},
                "IMPRESSIONS": {"integerValue": impressions},
                "AD_REQUESTS": {"integerValue": requests},
                "CLICKS": {"integerValue": clicks}
            }
        }
    })
}

/// A full streamed response: header, the given rows, footer.
pub fn report(rows: Vec<Value>) -> Value {
    let mut items = vec![json!({
        "header": {"localizationSettings": {"currencyCode": "USD"}}
    })];
    let count = rows.len();
    items.extend(rows);
    items.push(json!({"footer": {"matchingRowCount": count.to_string()}}));
    Value::Array(items)
}

pub async fn mount_report(server: &MockServer, body: Value, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(report_path()))
        .and(body_partial_json(body))
        .respond_with(response)
        .mount(server)
        .await;
}
