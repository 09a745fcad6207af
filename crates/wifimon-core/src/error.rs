// ── Core error types ──
//
// User-facing errors from wifimon-core. Front ends match on these rather
// than on HTTP details; `From<wifimon_api::Error>` does the translation.

use thiserror::Error;

use crate::cap::CapError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Auth errors ──────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// A 401 ended the session; the stored token is gone.
    #[error("Session expired -- log in again")]
    SessionExpired,

    #[error("Not logged in")]
    NotLoggedIn,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rejected by the API (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {message}")]
    InvalidResponse { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` when the only way forward is logging in.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotLoggedIn)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wifimon_api::Error> for CoreError {
    fn from(err: wifimon_api::Error) -> Self {
        use wifimon_api::Error as Api;

        match err {
            Api::Authentication { message } => Self::AuthenticationFailed { message },
            Api::SessionExpired => Self::SessionExpired,
            Api::NotAuthenticated => Self::NotLoggedIn,
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Rejected {
                        status: e.status().map_or(0, |s| s.as_u16()),
                        message: e.to_string(),
                    }
                }
            }
            Api::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("invalid API URL: {e}"),
            },
            Api::Tls(message) => Self::Config { message },
            Api::Api { status: 404, message } => Self::NotFound { message },
            Api::Api { status, message } => Self::Rejected { status, message },
            Api::Deserialization { message, .. } => Self::InvalidResponse { message },
            Api::MissingField(field) => Self::InvalidResponse {
                message: format!("missing `{field}`"),
            },
            Api::TokenStore(message) => Self::Config { message },
        }
    }
}

impl From<CapError> for CoreError {
    fn from(err: CapError) -> Self {
        Self::ValidationFailed {
            message: err.to_string(),
        }
    }
}
