//! Error types for the AdMob Stats core library.
//!
//! Every failure the library can report is an [`AdmobError`] carrying a stable
//! code, so that log lines and CLI output can be grepped for a specific class
//! of problem.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E2001-E2099 | Config | Config file, parse, and validation errors |
//! | E3001-E3099 | Connection | Setup-time connectivity checks |
//! | E5001-E5099 | API | Reporting API, OAuth token, and timeout errors |
//! | E6001-E6099 | Coordinator | Polling lifecycle and refresh errors |
//! | E7001-E7099 | Setup | Config flow and config entry store errors |
//! | E9001-E9099 | General | Internal, IO, and serialization errors |

use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// The main error type for the AdMob Stats core library.
#[derive(Debug, Error)]
pub enum AdmobError {
    // ========================================================================
    // Configuration Errors (E2001-E2099)
    // ========================================================================
    /// Configuration file not found
    #[error("[E2003] Configuration file not found: {0}")]
    ConfigFileNotFound(String),

    /// Configuration file parse error
    #[error("[E2004] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E2005] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    // ========================================================================
    // Connection Errors (E3001-E3099)
    // ========================================================================
    /// The account could not be reached with the supplied credentials
    #[error("[E3001] Cannot connect to AdMob account '{publisher_id}': {message}")]
    ConnectionFailed {
        publisher_id: String,
        message: String,
    },

    // ========================================================================
    // API Errors (E5001-E5099)
    // ========================================================================
    /// API request failed
    #[error("[E5001] API request failed: {0}")]
    ApiRequestFailed(String),

    /// API response parse error
    #[error("[E5002] Failed to parse API response: {0}")]
    ApiParseError(String),

    /// API authentication failed
    #[error("[E5003] API authentication failed for {service}: {message}")]
    ApiAuthenticationFailed { service: String, message: String },

    /// API service unavailable
    #[error("[E5004] API service unavailable: {0}")]
    ApiServiceUnavailable(String),

    /// Request timed out
    #[error("[E5005] Request timed out: {0}")]
    ApiTimeout(String),

    /// API rate limit exceeded
    #[error("[E5006] API rate limit exceeded for {service}")]
    ApiRateLimitExceeded { service: String },

    // ========================================================================
    // Coordinator Errors (E6001-E6099)
    // ========================================================================
    /// Coordinator polling loop already started
    #[error("[E6001] Coordinator '{0}' is already running")]
    CoordinatorAlreadyRunning(String),

    /// Coordinator polling loop is not running
    #[error("[E6002] Coordinator '{0}' is not running")]
    CoordinatorNotRunning(String),

    /// A refresh cycle failed
    #[error("[E6003] Refresh failed for '{name}': {message}")]
    RefreshFailed { name: String, message: String },

    // ========================================================================
    // Setup Errors (E7001-E7099)
    // ========================================================================
    /// Config entry not found
    #[error("[E7001] Config entry not found: {0}")]
    EntryNotFound(String),

    /// Publisher already configured
    #[error("[E7002] Publisher already configured: {0}")]
    AlreadyConfigured(String),

    /// Setup input failed validation
    #[error("[E7003] Invalid setup input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Internal error (catch-all for unexpected conditions)
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("[E9005] IO error: {0}")]
    IoError(String),

    /// Serialization/deserialization error
    #[error("[E9006] Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for AdMob Stats operations.
pub type AdmobResult<T> = Result<T, AdmobError>;

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

impl From<reqwest::Error> for AdmobError {
    fn from(err: reqwest::Error) -> Self {
        let service = || {
            err.url()
                .map(|u| u.host_str().unwrap_or("unknown").to_string())
                .unwrap_or_else(|| "unknown".to_string())
        };

        if err.is_timeout() {
            AdmobError::ApiTimeout(err.to_string())
        } else if err.is_connect() {
            AdmobError::ApiServiceUnavailable(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status() {
                if status.as_u16() == 429 {
                    return AdmobError::ApiRateLimitExceeded { service: service() };
                } else if status.as_u16() == 401 || status.as_u16() == 403 {
                    return AdmobError::ApiAuthenticationFailed {
                        service: service(),
                        message: status.to_string(),
                    };
                }
            }
            AdmobError::ApiRequestFailed(err.to_string())
        } else if err.is_decode() {
            AdmobError::ApiParseError(err.to_string())
        } else {
            AdmobError::ApiRequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AdmobError {
    fn from(err: serde_json::Error) -> Self {
        AdmobError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AdmobError {
    fn from(err: std::io::Error) -> Self {
        AdmobError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for AdmobError {
    fn from(err: toml::de::Error) -> Self {
        AdmobError::SerializationError(err.to_string())
    }
}

impl From<toml::ser::Error> for AdmobError {
    fn from(err: toml::ser::Error) -> Self {
        AdmobError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for AdmobError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => AdmobError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            config::ConfigError::FileParse { uri, cause } => AdmobError::ConfigParseError(
                format!("Failed to parse {}: {}", uri.unwrap_or_default(), cause),
            ),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => AdmobError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => AdmobError::ConfigParseError(err.to_string()),
        }
    }
}

// ============================================================================
// Error categorization helpers
// ============================================================================

impl AdmobError {
    /// Returns true if this error means the remote side could not be reached
    /// or refused the credentials. The setup flow maps these to `cannot_connect`.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            AdmobError::ConnectionFailed { .. }
                | AdmobError::ApiRequestFailed(_)
                | AdmobError::ApiAuthenticationFailed { .. }
                | AdmobError::ApiServiceUnavailable(_)
                | AdmobError::ApiTimeout(_)
                | AdmobError::ApiRateLimitExceeded { .. }
        )
    }

    /// Returns true if this error is transient and the next poll might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AdmobError::ApiServiceUnavailable(_)
                | AdmobError::ApiTimeout(_)
                | AdmobError::ApiRateLimitExceeded { .. }
                | AdmobError::RefreshFailed { .. }
        )
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            AdmobError::ConfigFileNotFound(_) => "E2003",
            AdmobError::ConfigParseError(_) => "E2004",
            AdmobError::InvalidConfigValue { .. } => "E2005",
            AdmobError::ConnectionFailed { .. } => "E3001",
            AdmobError::ApiRequestFailed(_) => "E5001",
            AdmobError::ApiParseError(_) => "E5002",
            AdmobError::ApiAuthenticationFailed { .. } => "E5003",
            AdmobError::ApiServiceUnavailable(_) => "E5004",
            AdmobError::ApiTimeout(_) => "E5005",
            AdmobError::ApiRateLimitExceeded { .. } => "E5006",
            AdmobError::CoordinatorAlreadyRunning(_) => "E6001",
            AdmobError::CoordinatorNotRunning(_) => "E6002",
            AdmobError::RefreshFailed { .. } => "E6003",
            AdmobError::EntryNotFound(_) => "E7001",
            AdmobError::AlreadyConfigured(_) => "E7002",
            AdmobError::InvalidInput { .. } => "E7003",
            AdmobError::Internal(_) => "E9001",
            AdmobError::IoError(_) => "E9005",
            AdmobError::SerializationError(_) => "E9006",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            AdmobError::ConfigParseError(_) | AdmobError::InvalidConfigValue { .. } => {
                Some("Check admob-stats.toml and the ADMOB_STATS_* environment variables")
            }
            AdmobError::ConnectionFailed { .. } | AdmobError::ApiAuthenticationFailed { .. } => {
                Some("Check the client id, client secret and refresh token, see https://developers.google.com/admob/api/v1/auth")
            }
            AdmobError::EntryNotFound(_) => {
                Some("Run 'admob-stats entries list' to see configured accounts")
            }
            AdmobError::AlreadyConfigured(_) => {
                Some("Remove the existing entry with 'admob-stats entries remove' first")
            }
            AdmobError::ApiRateLimitExceeded { .. } => {
                Some("Increase polling.interval_secs to lower the request rate")
            }
            _ => None,
        }
    }

    /// Log this error with appropriate severity level.
    pub fn log(&self) {
        let code = self.error_code();
        let suggestion = self.user_suggestion();

        if self.is_transient() {
            warn!(
                error_code = %code,
                suggestion = suggestion,
                "Transient error occurred: {}",
                self
            );
        } else {
            error!(
                error_code = %code,
                suggestion = suggestion,
                "Error occurred: {}",
                self
            );
        }
    }
}

// ============================================================================
// User-friendly error formatting for CLI
// ============================================================================

/// Format an error for CLI display with its suggestion.
pub struct CliErrorDisplay<'a> {
    error: &'a AdmobError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a AdmobError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error)?;

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                writeln!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        if self.error.is_transient() {
            writeln!(f)?;
            writeln!(f, "  This error may be temporary. The next poll will try again.")?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
