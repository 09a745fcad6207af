//! Presentation helpers shared by the CLI and the TUI.

use strum::{Display, EnumIter, IntoStaticStr};
use wifimon_api::{Alert, AlertStatus, Device};

use crate::gate::Page;

// ── Navigation ──────────────────────────────────────────────────────

/// Product name shown in headers.
pub const APP_TITLE: &str = "WiFi Monitor";

/// One entry of the dashboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub page: Page,
    pub label: &'static str,
}

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        page: Page::Overview,
        label: "Overview",
    },
    NavItem {
        page: Page::Devices,
        label: "Devices",
    },
    NavItem {
        page: Page::Alerts,
        label: "Alerts",
    },
    NavItem {
        page: Page::Agents,
        label: "Agents",
    },
    NavItem {
        page: Page::History,
        label: "History",
    },
];

// ── Device icons ────────────────────────────────────────────────────

/// Icon category for a device's reported `device_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DeviceIcon {
    Smartphone,
    Laptop,
    Tablet,
    SmartTv,
    Router,
    IotDevice,
    /// Anything unrecognised (or missing).
    Generic,
}

impl DeviceIcon {
    pub fn for_type(device_type: Option<&str>) -> Self {
        match device_type.map(str::to_ascii_lowercase).as_deref() {
            Some("smartphone") => Self::Smartphone,
            Some("laptop") => Self::Laptop,
            Some("tablet") => Self::Tablet,
            Some("smart_tv") => Self::SmartTv,
            Some("router") => Self::Router,
            Some("iot_device") => Self::IotDevice,
            _ => Self::Generic,
        }
    }

    pub fn for_device(device: &Device) -> Self {
        Self::for_type(device.device_type.as_deref())
    }

    /// One terminal cell wide, so table columns line up. Emoji would take
    /// two cells, or one or two depending on the terminal.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Smartphone => "▯",
            Self::Laptop => "▭",
            Self::Tablet => "▮",
            Self::SmartTv => "▬",
            Self::Router => "⇅",
            Self::IotDevice => "⌂",
            Self::Generic => "◦",
        }
    }
}

// ── Stat cards ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum CardKind {
    ConnectedDevices,
    TotalDevices,
    Agents,
    ActiveAlerts,
}

impl CardKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::ConnectedDevices => "Connected Devices",
            Self::TotalDevices => "Total Devices",
            Self::Agents => "Agents",
            Self::ActiveAlerts => "Active Alerts",
        }
    }
}

/// One headline number on the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub kind: CardKind,
    pub value: usize,
}

impl StatCard {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// The four overview cards, in display order.
pub fn stat_cards(devices: &[Device], agent_count: usize, alerts: &[Alert]) -> [StatCard; 4] {
    [
        StatCard {
            kind: CardKind::ConnectedDevices,
            value: devices.iter().filter(|d| d.is_active).count(),
        },
        StatCard {
            kind: CardKind::TotalDevices,
            value: devices.len(),
        },
        StatCard {
            kind: CardKind::Agents,
            value: agent_count,
        },
        StatCard {
            kind: CardKind::ActiveAlerts,
            value: alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Active)
                .count(),
        },
    ]
}

// ── Formatting ──────────────────────────────────────────────────────

/// Bytes → MiB, as the usage chart plots them.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

/// `"12.34 MB"`
pub fn fmt_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes_to_mb(bytes))
}

pub fn activity_label(is_active: bool) -> &'static str {
    if is_active { "Active" } else { "Inactive" }
}

/// `"2024-06-15 10:30"`, or `"never"`.
pub fn fmt_timestamp(ts: Option<&chrono::DateTime<chrono::Utc>>) -> String {
    ts.map_or_else(
        || "never".to_owned(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    fn device(active: bool) -> Device {
        serde_json::from_value(json!({
            "id": 1, "mac_address": "aa", "is_active": active
        }))
        .unwrap()
    }

    fn alert(status: &str) -> Alert {
        serde_json::from_value(json!({
            "id": 1, "title": "t", "threshold": 1.0, "status": status
        }))
        .unwrap()
    }

    #[test]
    fn icon_mapping() {
        assert_eq!(DeviceIcon::for_type(Some("smartphone")), DeviceIcon::Smartphone);
        assert_eq!(DeviceIcon::for_type(Some("smart_tv")), DeviceIcon::SmartTv);
        assert_eq!(DeviceIcon::for_type(Some("iot_device")), DeviceIcon::IotDevice);
        assert_eq!(DeviceIcon::for_type(Some("toaster")), DeviceIcon::Generic);
        assert_eq!(DeviceIcon::for_type(None), DeviceIcon::Generic);
    }

    #[test]
    fn icon_names_round_trip_through_mapping() {
        for icon in DeviceIcon::iter().filter(|i| *i != DeviceIcon::Generic) {
            let name: &'static str = icon.into();
            assert_eq!(DeviceIcon::for_type(Some(name)), icon);
        }
    }

    #[test]
    fn glyphs_are_single_narrow_chars() {
        let mut seen = std::collections::HashSet::new();
        for icon in DeviceIcon::iter() {
            let mut chars = icon.glyph().chars();
            let c = chars.next().unwrap();
            assert!(chars.next().is_none(), "{icon}: extra codepoints");
            assert!(u32::from(c) < 0x1F000, "{icon}: emoji-range glyph");
            assert!(seen.insert(c), "{icon}: glyph reused");
        }
    }

    #[test]
    fn cards_count_active_things() {
        let devices = vec![device(true), device(false), device(true)];
        let alerts = vec![alert("active"), alert("resolved"), alert("ACTIVE")];
        let cards = stat_cards(&devices, 4, &alerts);
        let values: Vec<_> = cards.iter().map(|c| (c.title(), c.value)).collect();
        assert_eq!(
            values,
            vec![
                ("Connected Devices", 2),
                ("Total Devices", 3),
                ("Agents", 4),
                ("Active Alerts", 2),
            ]
        );
    }

    #[test]
    fn mb_formatting() {
        assert_eq!(fmt_mb(1_048_576), "1.00 MB");
        assert_eq!(fmt_mb(0), "0.00 MB");
        assert_eq!(fmt_mb(1_572_864), "1.50 MB");
    }
}
