use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use crate::config::ApiConfig;
use crate::error::{AdmobError, AdmobResult};
use crate::models::{Credentials, DateRange, MetricRecord, MetricSnapshot, ReportPeriod};

use super::report::{parse_report, reduce_report};
use super::traits::{DynStatsSource, SourceFactory, StatsSource};
use super::types::{GenerateReportRequest, NetworkReportSpec, PublisherAccount, TokenResponse};

pub const ADMOB_REPORT_SCOPE: &str = "https://www.googleapis.com/auth/admob.report";

const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Client for the AdMob v1 reporting API.
///
/// Authenticates with the OAuth2 refresh-token grant and keeps the resulting
/// access token until shortly before it expires.
pub struct AdMobClient {
    client: Client,
    credentials: Credentials,
    base_url: String,
    token_url: String,
    token: Mutex<Option<AccessToken>>,
}

impl AdMobClient {
    pub fn new(credentials: Credentials, config: &ApiConfig) -> AdmobResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("admob-stats/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            credentials,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
            token: Mutex::new(None),
        })
    }

    pub fn publisher_id(&self) -> &str {
        &self.credentials.publisher_id
    }

    fn account_url(&self) -> String {
        format!("{}/v1/{}", self.base_url, self.credentials.account_name())
    }

    fn report_url(&self) -> String {
        format!("{}/networkReport:generate", self.account_url())
    }

    async fn access_token(&self) -> AdmobResult<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.refresh_access_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn refresh_access_token(&self) -> AdmobResult<AccessToken> {
        debug!("Requesting access token from {}", self.token_url);

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.credentials.refresh_token.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdmobError::ApiAuthenticationFailed {
                service: "oauth2".to_string(),
                message: format!("{}: {}", status, body.trim()),
            });
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = token.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);

        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }

    /// Fetch the publisher account resource.
    pub async fn get_account(&self) -> AdmobResult<PublisherAccount> {
        let token = self.access_token().await?;

        let account = self
            .client
            .get(self.account_url())
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json::<PublisherAccount>()
            .await?;

        Ok(account)
    }

    /// One authenticated read against the account resource.
    ///
    /// Every failure, whether token, transport or status, is returned as
    /// [`AdmobError::ConnectionFailed`].
    pub async fn test_connection(&self) -> AdmobResult<bool> {
        match self.get_account().await {
            Ok(account) => {
                info!("Connected to AdMob account {}", account.name);
                Ok(true)
            }
            Err(e) => {
                error!("Error testing connection: {}", e);
                Err(AdmobError::ConnectionFailed {
                    publisher_id: self.credentials.publisher_id.clone(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Report totals for one range.
    ///
    /// A non-2xx status or an undecodable body degrades the range to the zero
    /// record. Transport failures, timeouts included, are returned as errors.
    async fn fetch_period(
        &self,
        token: &str,
        period: ReportPeriod,
        range: DateRange,
    ) -> AdmobResult<MetricRecord> {
        let body = GenerateReportRequest {
            report_spec: NetworkReportSpec::daily(range),
        };

        let response = self
            .client
            .post(self.report_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                period = %period,
                range = %range,
                "HTTP error generating report: {} {}",
                status,
                body.trim()
            );
            return Ok(MetricRecord::zero());
        }

        let text = response.text().await?;

        match parse_report(&text).and_then(|items| reduce_report(&items)) {
            Ok(record) => {
                debug!(
                    period = %period,
                    range = %range,
                    days = range.days(),
                    earnings = record.earnings,
                    impressions = record.impressions,
                    "Report reduced"
                );
                Ok(record)
            }
            Err(e) => {
                error!(period = %period, range = %range, "Failed to read report: {}", e);
                Ok(MetricRecord::zero())
            }
        }
    }

    /// Stats for the four periods as seen from `today`.
    #[instrument(skip(self), fields(publisher_id = %self.credentials.publisher_id))]
    pub async fn get_stats_for(&self, today: NaiveDate) -> AdmobResult<MetricSnapshot> {
        let token = self.access_token().await?;
        let mut snapshot = MetricSnapshot::new();

        for period in ReportPeriod::ALL {
            let range = period.date_range(today);
            let record = self.fetch_period(&token, period, range).await?;
            snapshot.insert(period, record);
        }

        Ok(snapshot)
    }

    /// Stats for the four periods relative to the local date.
    pub async fn get_stats(&self) -> AdmobResult<MetricSnapshot> {
        self.get_stats_for(Local::now().date_naive()).await
    }
}

#[async_trait]
impl StatsSource for AdMobClient {
    fn source_name(&self) -> &str {
        "admob"
    }

    async fn test_connection(&self) -> AdmobResult<bool> {
        AdMobClient::test_connection(self).await
    }

    async fn fetch_stats(&self) -> AdmobResult<MetricSnapshot> {
        self.get_stats().await
    }
}

/// Factory producing an [`AdMobClient`] per set of credentials.
pub fn admob_source_factory(config: ApiConfig) -> SourceFactory {
    Arc::new(move |credentials: &Credentials| -> AdmobResult<DynStatsSource> {
        let client = AdMobClient::new(credentials.clone(), &config)?;
        Ok(Arc::new(client) as DynStatsSource)
    })
}
