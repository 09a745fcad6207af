// wifimon-core: View state and session logic between wifimon-api and the front ends.

pub mod cap;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gate;
pub mod present;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cap::{CapError, CapInput, format_cap, parse_cap};
pub use config::{ClientConfig, TlsVerification, TokenStorage};
pub use error::CoreError;
pub use fetch::FetchState;
pub use gate::{AuthGate, GateDecision, Page, Route};
pub use view::{
    AgentForm, AgentsView, AlertHistoryView, AlertsView, DetailTicket, DevicesView, OverviewFetch,
    OverviewView,
};

// The API surface front ends need, so they can depend on core alone.
pub use wifimon_api::{
    Agent, Alert, AlertDraft, AlertHistoryEntry, AlertStatus, ApiClient, AuthState,
    DEFAULT_BASE_URL, DEFAULT_STATS_HOURS, Device, DeviceStat, DeviceUsage, Health,
    RegisteredAgent, TOKEN_NAME, User,
};
pub use wifimon_api::Error as ApiError;
