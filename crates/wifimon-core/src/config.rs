// ── Runtime client configuration ──
//
// Describes *how* to reach the API and where the token lives. Never reads
// files itself; the CLI/TUI build a `ClientConfig` and hand it in.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;
use wifimon_api::{
    ApiClient, FileTokenStore, KeyringTokenStore, MemoryTokenStore, TlsMode,
    TokenStore, TransportConfig,
};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    #[default]
    SystemDefaults,
    CustomCa(PathBuf),
    DangerAcceptInvalid,
}

/// Where the access token is persisted.
#[derive(Debug, Clone)]
pub enum TokenStorage {
    /// A file (normally `<data dir>/access_token`).
    File(PathBuf),
    /// The OS keyring, keyed by profile.
    Keyring { profile: String },
    /// Nothing persisted.
    Memory,
}

/// Everything needed to build an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
    pub token_storage: TokenStorage,
    /// Window for device usage samples.
    pub stats_hours: u32,
}

impl ClientConfig {
    /// Defaults for everything but the URL: 30 s timeout, in-memory token, 24 h stats.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            token_storage: TokenStorage::Memory,
            stats_hours: wifimon_api::DEFAULT_STATS_HOURS,
        }
    }

    fn token_store(&self) -> Arc<dyn TokenStore> {
        match &self.token_storage {
            TokenStorage::File(path) => Arc::new(FileTokenStore::new(path.clone())),
            TokenStorage::Keyring { profile } => Arc::new(KeyringTokenStore::new(profile.clone())),
            TokenStorage::Memory => Arc::new(MemoryTokenStore::new()),
        }
    }

    /// Build the shared API client.
    pub fn connect(&self) -> Result<ApiClient, CoreError> {
        let transport = TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        };
        Ok(ApiClient::new(
            self.api_url.as_str(),
            self.token_store(),
            &transport,
        )?)
    }
}
