use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Credentials;
use crate::DOMAIN;

pub const ENTRY_VERSION: u32 = 1;

/// One validated, persisted set of credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub domain: String,
    pub title: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub data: Credentials,
}

impl ConfigEntry {
    pub fn new(data: Credentials) -> Self {
        Self {
            entry_id: Uuid::new_v4().to_string(),
            domain: DOMAIN.to_string(),
            title: entry_title(&data.publisher_id),
            version: ENTRY_VERSION,
            created_at: Utc::now(),
            data,
        }
    }

    pub fn publisher_id(&self) -> &str {
        &self.data.publisher_id
    }
}

pub fn entry_title(publisher_id: &str) -> String {
    format!("AdMob ({})", publisher_id)
}
