use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AdmobError, AdmobResult};

/// OAuth client credentials plus the AdMob publisher they grant access to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub publisher_id: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
        publisher_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            publisher_id: publisher_id.into(),
        }
    }

    /// Resource name of the publisher account, e.g. `accounts/pub-123`.
    pub fn account_name(&self) -> String {
        format!("accounts/{}", self.publisher_id)
    }

    /// Fields that are empty after trimming, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("refresh_token", &self.refresh_token),
            ("publisher_id", &self.publisher_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn validate(&self) -> AdmobResult<()> {
        match self.missing_fields().first() {
            Some(field) => Err(AdmobError::InvalidInput {
                field: field.to_string(),
                message: "Value is required".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("refresh_token", &"***")
            .field("publisher_id", &self.publisher_id)
            .finish()
    }
}
