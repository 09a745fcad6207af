//! All UI actions. Actions are the only way state changes.

use wifimon_core::{
    Agent, Alert, AlertHistoryEntry, CoreError, DetailTicket, Device, DeviceStat, GateDecision,
    OverviewFetch, RegisteredAgent, Route, User,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// A finished request, delivered to the screen that started it.
#[derive(Debug)]
pub enum Loaded {
    SignIn(Result<(), CoreError>),
    SignUp(Result<User, CoreError>),
    Overview(OverviewFetch),
    Devices(Result<Vec<Device>, CoreError>),
    DeviceStats {
        ticket: DetailTicket,
        result: Result<Vec<DeviceStat>, CoreError>,
    },
    CapSaved(Result<Device, CoreError>),
    Agents(Result<Vec<Agent>, CoreError>),
    AgentRegistered(Result<RegisteredAgent, CoreError>),
    Alerts(Result<Vec<Alert>, CoreError>),
    History(Result<Vec<AlertHistoryEntry>, CoreError>),
}

impl Loaded {
    /// The screen that owns this result, whichever screen is showing.
    pub fn screen(&self) -> ScreenId {
        match self {
            Self::SignIn(_) | Self::SignUp(_) => ScreenId::Login,
            Self::Overview(_) => ScreenId::Overview,
            Self::Devices(_) | Self::DeviceStats { .. } | Self::CapSaved(_) => ScreenId::Devices,
            Self::Agents(_) | Self::AgentRegistered(_) => ScreenId::Agents,
            Self::Alerts(_) => ScreenId::Alerts,
            Self::History(_) => ScreenId::History,
        }
    }
}

#[derive(Debug)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,
    /// Re-fetch whatever the active screen shows.
    Refresh,

    // ── Session ───────────────────────────────────────────────────
    /// The gate answered a navigation check.
    RouteChecked {
        route: Route,
        decision: GateDecision,
        user: Option<User>,
    },
    /// Credentials were accepted; re-run the gate.
    LoggedIn,
    Logout,
    /// The client dropped to unauthenticated (a 401 or a logout).
    SessionEnded,

    // ── Data ──────────────────────────────────────────────────────
    Loaded(Loaded),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}

/// A toast for a failed fetch. Session loss is announced centrally, so it
/// gets none here.
pub fn failure_notice<T>(what: &str, result: &Result<T, CoreError>) -> Option<Action> {
    match result {
        Err(e) if !e.requires_login() => Some(Action::Notify(Notification::error(format!(
            "Failed to load {what}: {e}"
        )))),
        _ => None,
    }
}
