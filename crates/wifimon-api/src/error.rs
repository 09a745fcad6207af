use thiserror::Error;

/// Top-level error type for the `wifimon-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, API-level rejections, payload decoding and the local token
/// store. `wifimon-core` maps these into view-level outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login or registration rejected (wrong credentials, duplicate email, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The backend answered 401 to an authenticated request. The stored
    /// token has already been cleared when this is returned.
    #[error("Session expired -- log in again")]
    SessionExpired,

    /// A protected endpoint was called with no stored access token.
    #[error("Not logged in")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success status, with the `message` from the error envelope when present.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A success envelope lacked a field the operation needs.
    #[error("Response is missing `{0}`")]
    MissingField(&'static str),

    // ── Token store ─────────────────────────────────────────────────
    /// Reading or writing the persisted access token failed.
    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl Error {
    /// Returns `true` if this error means the user has to log in (again).
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotAuthenticated)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::SessionExpired => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
