// wifimon-api: Async Rust client for the wifimon monitoring REST API

pub mod agents;
pub mod alerts;
pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod system;
pub mod token;
pub mod transport;

pub use client::{ApiClient, AuthState, DEFAULT_BASE_URL};
pub use devices::DEFAULT_STATS_HOURS;
pub use error::Error;
pub use models::{
    Agent, Alert, AlertDraft, AlertHistoryEntry, AlertStatus, Device, DeviceStat, DeviceUsage,
    Health, RegisteredAgent, User,
};
pub use token::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TOKEN_NAME, TokenStore};
pub use transport::{TlsMode, TransportConfig};
