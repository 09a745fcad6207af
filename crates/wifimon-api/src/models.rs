// Wire types for the wifimon REST API.
//
// Every endpoint wraps its payload as `{ "status": "...", "data": ... }`.
// List payloads may be absent or `null`; those decode as empty lists.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Envelope ────────────────────────────────────────────────────────

/// Standard response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of an error response (`{"status": "error", "message": "..."}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.msg)
    }
}

/// `POST /auth/login` returns the token next to `status`, outside `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

// ── Timestamps ──────────────────────────────────────────────────────

/// Accept RFC 3339 or a naive ISO-8601 timestamp (taken as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn de_opt_timestamp<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
    }
}

/// `null` → `T::default()`; serde's `default` alone only covers a missing key.
fn de_null_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

// ── Users ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

// ── Devices ─────────────────────────────────────────────────────────

/// A client device seen on the monitored network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    #[serde(default)]
    pub owner_id: Option<i64>,
    pub mac_address: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub is_active: bool,
    /// Configured quota in bytes; `None` means uncapped.
    #[serde(default)]
    pub data_cap: Option<u64>,
}

impl Device {
    /// Hostname when known, MAC address otherwise.
    pub fn display_name(&self) -> &str {
        self.hostname
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(&self.mac_address)
    }
}

/// `PUT /devices/{id}` body. `data_cap: None` serializes as `null` to clear the cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCapUpdate {
    pub data_cap: Option<u64>,
}

/// One usage sample for a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStat {
    #[serde(default)]
    pub id: Option<i64>,
    pub device_id: i64,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub bytes_uploaded: u64,
    #[serde(default, deserialize_with = "de_null_default")]
    pub bytes_downloaded: u64,
    #[serde(default)]
    pub total_bytes: Option<u64>,
}

impl DeviceStat {
    pub fn total(&self) -> u64 {
        self.total_bytes
            .unwrap_or_else(|| self.bytes_uploaded.saturating_add(self.bytes_downloaded))
    }
}

/// Aggregated usage for one device over an optional window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUsage {
    pub device_id: i64,
    #[serde(default, deserialize_with = "de_null_default")]
    pub bytes_uploaded: u64,
    #[serde(default, deserialize_with = "de_null_default")]
    pub bytes_downloaded: u64,
    #[serde(default, deserialize_with = "de_null_default")]
    pub total_bytes: u64,
}

// ── Agents ──────────────────────────────────────────────────────────

/// A collector process reporting device and usage data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Result of `POST /agents/register`. The key is only ever returned here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredAgent {
    #[serde(flatten)]
    pub agent: Agent,
    pub api_key: String,
}

// ── Alerts ──────────────────────────────────────────────────────────

/// Lifecycle of an alert definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertStatus {
    Active,
    Resolved,
    Other(String),
}

impl AlertStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for AlertStatus {
    fn from(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "resolved" => Self::Resolved,
            _ => Self::Other(raw.to_owned()),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AlertStatus {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AlertStatus {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// Shape the backend actually sends; folded into [`Alert`].
#[derive(Deserialize)]
struct RawAlert {
    id: i64,
    #[serde(default, alias = "alert_type")]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "threshold_value")]
    threshold: Option<f64>,
    #[serde(default)]
    status: Option<AlertStatus>,
    #[serde(default)]
    is_enabled: Option<bool>,
    #[serde(default)]
    device_id: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

/// A configured threshold rule.
///
/// `title`/`threshold` also accept the backend's `alert_type`/`threshold_value`.
/// Without an explicit `status`, an enabled rule counts as active and a
/// disabled one as `disabled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAlert")]
pub struct Alert {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// MB/s.
    pub threshold: f64,
    pub status: AlertStatus,
    pub is_enabled: Option<bool>,
    pub device_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<RawAlert> for Alert {
    fn from(raw: RawAlert) -> Self {
        let status = raw.status.unwrap_or(match raw.is_enabled {
            Some(false) => AlertStatus::Other("disabled".into()),
            _ => AlertStatus::Active,
        });
        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            description: raw.description,
            threshold: raw.threshold.unwrap_or_default(),
            status,
            is_enabled: raw.is_enabled,
            device_id: raw.device_id,
            created_at: raw.created_at,
        }
    }
}

/// Body for `POST /alerts` and `PUT /alerts/{id}`. Unset fields are omitted.
///
/// Sent in the backend's spelling (`alert_type`, integer `threshold_value`).
/// The backend has no status column: `status` is folded into `is_enabled`,
/// and an explicit `is_enabled` wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(into = "AlertBody")]
pub struct AlertDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    /// MB/s, must be positive.
    pub threshold: Option<u32>,
    pub status: Option<AlertStatus>,
    pub device_id: Option<i64>,
    pub is_enabled: Option<bool>,
}

#[derive(Serialize)]
struct AlertBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    alert_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold_value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_enabled: Option<bool>,
}

impl AlertStatus {
    /// The `is_enabled` value this status stands for, if any.
    pub fn enabled_flag(&self) -> Option<bool> {
        match self {
            Self::Active => Some(true),
            Self::Resolved => Some(false),
            Self::Other(s) if s.eq_ignore_ascii_case("enabled") => Some(true),
            Self::Other(s) if s.eq_ignore_ascii_case("disabled") => Some(false),
            Self::Other(_) => None,
        }
    }
}

impl From<AlertDraft> for AlertBody {
    fn from(draft: AlertDraft) -> Self {
        let is_enabled = draft
            .is_enabled
            .or_else(|| draft.status.as_ref().and_then(AlertStatus::enabled_flag));
        Self {
            alert_type: draft.title,
            description: draft.description,
            threshold_value: draft.threshold,
            device_id: draft.device_id,
            is_enabled,
        }
    }
}

/// One recorded breach of an alert rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertHistoryEntry {
    pub id: i64,
    pub alert_id: i64,
    #[serde(default)]
    pub device_id: Option<i64>,
    #[serde(default, deserialize_with = "de_null_default")]
    pub value_at_trigger: f64,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub triggered_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub resolved_at: Option<DateTime<Utc>>,
}

// ── System ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}
