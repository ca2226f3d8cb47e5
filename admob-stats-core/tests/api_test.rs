mod common;

use admob_stats_core::{AdMobClient, AdmobError, ApiConfig, MetricRecord, ReportPeriod};
use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

fn march_15() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

async fn client(server: &MockServer) -> AdMobClient {
    AdMobClient::new(credentials(), &api_config(server)).unwrap()
}

mod connection_tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_succeeds() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_account(&server).await;

        assert!(client(&server).await.test_connection().await.unwrap());
    }

    #[tokio::test]
    async fn test_connection_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.test_connection().await.unwrap_err();

        assert!(matches!(err, AdmobError::ConnectionFailed { .. }));
        assert!(err.to_string().contains("invalid_grant"));
        assert!(err.is_connection_error());
    }

    #[tokio::test]
    async fn test_connection_account_forbidden() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/accounts/{}", PUBLISHER_ID)))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client(&server).await.test_connection().await.unwrap_err();
        assert_eq!(err.error_code(), "E3001");
    }

    #[tokio::test]
    async fn test_token_request_is_refresh_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("client_secret=client-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": ACCESS_TOKEN,
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_account(&server).await;

        let client = client(&server).await;
        client.test_connection().await.unwrap();
        client.test_connection().await.unwrap();
    }
}

mod stats_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_stats_reduces_each_range() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        mount_report(
            &server,
            range_body((2024, 3, 15), (2024, 3, 15)),
            ResponseTemplate::new(200).set_body_json(report(vec![row(
                "20240315", "1500000", "1000", "1200", "10",
            )])),
        )
        .await;
        mount_report(
            &server,
            range_body((2024, 3, 14), (2024, 3, 14)),
            ResponseTemplate::new(200).set_body_json(report(vec![row(
                "20240314", "2250000", "2000", "2400", "20",
            )])),
        )
        .await;
        mount_report(
            &server,
            range_body((2024, 3, 1), (2024, 3, 15)),
            ResponseTemplate::new(200).set_body_json(report(vec![
                row("20240315", "1500000", "1000", "1200", "10"),
                row("20240314", "2250000", "2000", "2400", "20"),
            ])),
        )
        .await;
        mount_report(
            &server,
            range_body((2024, 2, 1), (2024, 2, 29)),
            ResponseTemplate::new(200).set_body_json(report(vec![])),
        )
        .await;

        let snapshot = client(&server).await.get_stats_for(march_15()).await.unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(
            snapshot.get(ReportPeriod::Today),
            Some(&MetricRecord {
                earnings: 1.5,
                impressions: 1000,
                ad_requests: 1200,
                clicks: 10,
            })
        );
        assert_eq!(snapshot.get(ReportPeriod::Yesterday).unwrap().earnings, 2.25);
        assert_eq!(
            snapshot.get(ReportPeriod::ThisMonth),
            Some(&MetricRecord {
                earnings: 3.75,
                impressions: 3000,
                ad_requests: 3600,
                clicks: 30,
            })
        );
        assert!(snapshot.get(ReportPeriod::LastMonth).unwrap().is_zero());
    }

    #[tokio::test]
    async fn test_failing_range_degrades_to_zero() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        let good = || {
            ResponseTemplate::new(200).set_body_json(report(vec![row(
                "20240315", "990000", "50", "60", "2",
            )]))
        };
        mount_report(&server, range_body((2024, 3, 15), (2024, 3, 15)), good()).await;
        mount_report(
            &server,
            range_body((2024, 3, 14), (2024, 3, 14)),
            ResponseTemplate::new(500).set_body_json(json!({
                "error": {"code": 500, "message": "Internal error", "status": "INTERNAL"}
            })),
        )
        .await;
        mount_report(&server, range_body((2024, 3, 1), (2024, 3, 15)), good()).await;
        mount_report(&server, range_body((2024, 2, 1), (2024, 2, 29)), good()).await;

        let snapshot = client(&server).await.get_stats_for(march_15()).await.unwrap();

        assert!(snapshot.is_complete());
        assert!(snapshot.get(ReportPeriod::Yesterday).unwrap().is_zero());
        for period in [ReportPeriod::Today, ReportPeriod::ThisMonth, ReportPeriod::LastMonth] {
            let record = snapshot.get(period).unwrap();
            assert_eq!(record.earnings, 0.99);
            assert_eq!(record.clicks, 2);
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_degrades_to_zero() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path(report_path()))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let snapshot = client(&server).await.get_stats_for(march_15()).await.unwrap();

        assert_eq!(snapshot.len(), 4);
        assert!(snapshot.periods.values().all(|r| r.is_zero()));
    }

    #[tokio::test]
    async fn test_empty_body_is_zero() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path(report_path()))
            .respond_with(ResponseTemplate::new(200))
            .expect(4)
            .mount(&server)
            .await;

        let snapshot = client(&server).await.get_stats_for(march_15()).await.unwrap();
        assert!(snapshot.periods.values().all(|r| r.is_zero()));
    }

    #[tokio::test]
    async fn test_token_failure_aborts_get_stats() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(report_path()))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get_stats_for(march_15())
            .await
            .unwrap_err();
        assert!(matches!(err, AdmobError::ApiAuthenticationFailed { .. }));
    }

    #[tokio::test]
    async fn test_report_timeout_fails_get_stats() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path(report_path()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(report(vec![]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ApiConfig {
            timeout_secs: 1,
            ..api_config(&server)
        };
        let client = AdMobClient::new(credentials(), &config).unwrap();

        let err = client.get_stats_for(march_15()).await.unwrap_err();
        assert!(matches!(err, AdmobError::ApiTimeout(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_unreachable_report_endpoint_fails_get_stats() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..api_config(&server)
        };
        let client = AdMobClient::new(credentials(), &config).unwrap();

        let err = client.get_stats_for(march_15()).await.unwrap_err();
        assert!(matches!(err, AdmobError::ApiServiceUnavailable(_)));
    }
}
