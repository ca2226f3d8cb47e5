use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::SourceFactory;
use crate::error::{AdmobError, AdmobResult};
use crate::models::Credentials;

use super::entry::{entry_title, ConfigEntry};
use super::store::ConfigEntryStore;

pub const STEP_USER: &str = "user";
pub const SETUP_URL: &str = "https://developers.google.com/admob/api/v1/auth";

pub const ERROR_BASE: &str = "base";
pub const ERROR_CANNOT_CONNECT: &str = "cannot_connect";
pub const ERROR_UNKNOWN: &str = "unknown";
pub const ERROR_REQUIRED: &str = "required";
pub const ABORT_ALREADY_CONFIGURED: &str = "already_configured";

/// Outcome of one flow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowResult {
    ShowForm {
        step_id: String,
        errors: BTreeMap<String, String>,
        description_placeholders: BTreeMap<String, String>,
    },
    CreateEntry(ConfigEntry),
    Abort {
        reason: String,
    },
}

impl FlowResult {
    fn form(errors: BTreeMap<String, String>) -> Self {
        let mut placeholders = BTreeMap::new();
        placeholders.insert("setup_url".to_string(), SETUP_URL.to_string());

        FlowResult::ShowForm {
            step_id: STEP_USER.to_string(),
            errors,
            description_placeholders: placeholders,
        }
    }

    pub fn errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            FlowResult::ShowForm { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn entry(&self) -> Option<&ConfigEntry> {
        match self {
            FlowResult::CreateEntry(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Interactive setup: collect credentials, prove they work, persist them.
pub struct ConfigFlow {
    store: Arc<ConfigEntryStore>,
    source_factory: SourceFactory,
}

impl ConfigFlow {
    pub fn new(store: Arc<ConfigEntryStore>, source_factory: SourceFactory) -> Self {
        Self {
            store,
            source_factory,
        }
    }

    /// The single user step.
    ///
    /// `None` shows the empty form. Invalid input re-shows the form with error
    /// keys and persists nothing.
    pub async fn step_user(&self, input: Option<Credentials>) -> AdmobResult<FlowResult> {
        let Some(credentials) = input else {
            return Ok(FlowResult::form(BTreeMap::new()));
        };

        let mut errors = BTreeMap::new();
        for field in credentials.missing_fields() {
            errors.insert(field.to_string(), ERROR_REQUIRED.to_string());
        }
        if !errors.is_empty() {
            return Ok(FlowResult::form(errors));
        }

        if self
            .store
            .find_by_publisher(&credentials.publisher_id)
            .await?
            .is_some()
        {
            info!(
                "Publisher {} is already configured",
                credentials.publisher_id
            );
            return Ok(FlowResult::Abort {
                reason: ABORT_ALREADY_CONFIGURED.to_string(),
            });
        }

        match self.validate_input(&credentials).await {
            Ok(title) => {
                let mut entry = ConfigEntry::new(credentials);
                entry.title = title;

                match self.store.add(entry.clone()).await {
                    Ok(()) => Ok(FlowResult::CreateEntry(entry)),
                    Err(AdmobError::AlreadyConfigured(_)) => Ok(FlowResult::Abort {
                        reason: ABORT_ALREADY_CONFIGURED.to_string(),
                    }),
                    Err(e) => Err(e),
                }
            }
            Err(key) => {
                errors.insert(ERROR_BASE.to_string(), key.to_string());
                Ok(FlowResult::form(errors))
            }
        }
    }

    /// One live connection test. Returns the entry title, or the form error key.
    pub async fn validate_input(&self, credentials: &Credentials) -> Result<String, &'static str> {
        let source = match (self.source_factory)(credentials) {
            Ok(source) => source,
            Err(e) => {
                error!("Unexpected exception while building client: {}", e);
                return Err(ERROR_UNKNOWN);
            }
        };

        match source.test_connection().await {
            Ok(true) => Ok(entry_title(&credentials.publisher_id)),
            Ok(false) => {
                warn!("Connection test for {} returned false", credentials.publisher_id);
                Err(ERROR_CANNOT_CONNECT)
            }
            Err(e) if e.is_connection_error() => Err(ERROR_CANNOT_CONNECT),
            Err(e) => {
                error!("Unexpected exception: {}", e);
                Err(ERROR_UNKNOWN)
            }
        }
    }
}
