//! Colours and the styles the dashboard gives its data.
//!
//! Screens ask for a style by meaning (an alert's state, a toast level, a
//! usage bar) rather than picking palette entries themselves.

use ratatui::style::{Color, Modifier, Style};

use wifimon_core::AlertStatus;
use wifimon_core::present::{CardKind, StatCard};

use crate::action::NotificationLevel;

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255);
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234);
pub const CORAL: Color = Color::Rgb(255, 106, 193);
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140);
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123);
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99);
pub const LIGHT_BLUE: Color = Color::Rgb(139, 233, 253);
pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207);
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164);
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54);
pub const BG_DARK: Color = Color::Rgb(30, 31, 41);

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

// ── Chrome ────────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    fg(BORDER_GRAY)
}

/// Full-screen backdrop behind the login form and toasts.
pub fn backdrop() -> Style {
    Style::default().bg(BG_DARK)
}

pub fn tab(active: bool) -> Style {
    if active {
        fg(ELECTRIC_PURPLE).add_modifier(Modifier::BOLD)
    } else {
        fg(DIM_WHITE)
    }
}

pub fn key_hint() -> Style {
    fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn help_text() -> Style {
    fg(NEON_CYAN)
}

// ── Tables and detail panels ──────────────────────────────────────────

pub fn table_header() -> Style {
    fg(NEON_CYAN).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Left-hand labels in a detail panel.
pub fn label() -> Style {
    fg(DIM_WHITE)
}

/// Highlighted values in a detail panel.
pub fn value() -> Style {
    fg(NEON_CYAN)
}

/// Hardware addresses.
pub fn mac() -> Style {
    fg(CORAL)
}

// ── Data ──────────────────────────────────────────────────────────────

/// Active/inactive and similar two-way states.
pub fn status(good: bool) -> Style {
    fg(if good { SUCCESS_GREEN } else { ERROR_RED })
}

/// Statuses the dashboard does not know are shown muted.
pub fn alert_status(status: &AlertStatus) -> Style {
    match status {
        AlertStatus::Active => fg(ELECTRIC_YELLOW),
        AlertStatus::Resolved => fg(SUCCESS_GREEN),
        AlertStatus::Other(_) => fg(BORDER_GRAY),
    }
}

/// History entries that have not resolved yet.
pub fn open_breach() -> Style {
    fg(ELECTRIC_YELLOW)
}

/// Colour of an overview card's number. Active alerts only turn red when
/// there are any.
pub fn card_accent(card: StatCard) -> Color {
    match card.kind {
        CardKind::ConnectedDevices => SUCCESS_GREEN,
        CardKind::TotalDevices => NEON_CYAN,
        CardKind::Agents => LIGHT_BLUE,
        CardKind::ActiveAlerts if card.value > 0 => ERROR_RED,
        CardKind::ActiveAlerts => DIM_WHITE,
    }
}

pub fn usage_bar() -> Style {
    fg(ELECTRIC_PURPLE)
}

/// Number printed inside a usage bar.
pub fn usage_value() -> Style {
    fg(BG_DARK).bg(ELECTRIC_PURPLE)
}

// ── Feedback ──────────────────────────────────────────────────────────

/// Signed-in indicator in the status bar.
pub fn session(signed_in: bool) -> Style {
    fg(if signed_in { SUCCESS_GREEN } else { ELECTRIC_YELLOW })
}

/// Accent colour and icon for a toast.
pub fn notification(level: NotificationLevel) -> (Color, &'static str) {
    match level {
        NotificationLevel::Success => (SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (ERROR_RED, "✗"),
        NotificationLevel::Warning => (ELECTRIC_YELLOW, "!"),
        NotificationLevel::Info => (NEON_CYAN, "·"),
    }
}

/// Inline message under a form that the server or validation rejected.
pub fn form_error() -> Style {
    fg(ERROR_RED)
}

/// Popups asking the user to fix something.
pub fn warning_popup() -> Style {
    fg(ELECTRIC_YELLOW).bg(BG_DARK)
}

pub fn info_popup() -> Style {
    fg(DIM_WHITE).bg(BG_DARK)
}

pub fn throbber() -> Style {
    fg(ELECTRIC_PURPLE)
}
