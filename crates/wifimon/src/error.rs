//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wifimon_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the API at {url}")]
    #[diagnostic(
        code(wifimon::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Override the URL with --api-url or: wifimon config set api_url <url>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(code(wifimon::auth_failed), help("Check your email and password."))]
    AuthFailed { message: String },

    #[error("Not logged in (profile '{profile}')")]
    #[diagnostic(code(wifimon::not_logged_in), help("Run: wifimon login"))]
    NotLoggedIn { profile: String },

    #[error("Session expired (profile '{profile}')")]
    #[diagnostic(
        code(wifimon::session_expired),
        help("The stored token was rejected and has been removed.\nRun: wifimon login")
    )]
    SessionExpired { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(wifimon::not_found),
        help("Run: wifimon {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(wifimon::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from the API: {message}")]
    #[diagnostic(
        code(wifimon::invalid_response),
        help("Is --api-url pointing at the /api/v1 root?")
    )]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wifimon::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wifimon::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: wifimon config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(wifimon::config))]
    Config(wifimon_config::ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(wifimon::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(wifimon::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Local ────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(wifimon::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotLoggedIn { .. } | Self::SessionExpired { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to session errors.
    pub fn for_profile(self, profile: &str) -> Self {
        match self {
            Self::NotLoggedIn { .. } => Self::NotLoggedIn {
                profile: profile.into(),
            },
            Self::SessionExpired { .. } => Self::SessionExpired {
                profile: profile.into(),
            },
            other => other,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<wifimon_config::ConfigError> for CliError {
    fn from(err: wifimon_config::ConfigError) -> Self {
        match err {
            wifimon_config::ConfigError::Validation { field, reason } => {
                Self::Validation { field, reason }
            }
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::SessionExpired => Self::SessionExpired {
                profile: "current".into(),
            },
            CoreError::NotLoggedIn => Self::NotLoggedIn {
                profile: "current".into(),
            },
            CoreError::NotFound { message } => Self::NotFound {
                resource_type: "resource".into(),
                identifier: message,
                list_command: "--help".into(),
            },
            CoreError::Rejected { status, message } => Self::ApiError { status, message },
            CoreError::InvalidResponse { message } => Self::InvalidResponse { message },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<wifimon_core::ApiError> for CliError {
    fn from(err: wifimon_core::ApiError) -> Self {
        CoreError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(CliError::from(CoreError::SessionExpired).exit_code(), 3);
        assert_eq!(CliError::from(CoreError::NotLoggedIn).exit_code(), 3);
        assert_eq!(
            CliError::from(CoreError::Timeout { timeout_secs: 5 }).exit_code(),
            8
        );
        assert_eq!(
            CliError::from(CoreError::ConnectionFailed {
                url: "http://x".into(),
                reason: "refused".into(),
            })
            .exit_code(),
            7
        );
        assert_eq!(
            CliError::from(CoreError::ValidationFailed {
                message: "bad cap".into()
            })
            .exit_code(),
            2
        );
        assert_eq!(
            CliError::from(CoreError::Rejected {
                status: 500,
                message: "boom".into()
            })
            .exit_code(),
            1
        );
    }

    #[test]
    fn profile_is_attached_to_session_errors() {
        let err = CliError::from(CoreError::NotLoggedIn).for_profile("lab");
        assert!(err.to_string().contains("'lab'"));
    }
}
