//! Screen identifiers and their mapping onto dashboard routes.

use std::fmt;

use wifimon_core::present::NAV_ITEMS;
use wifimon_core::{Page, Route};

/// Each top-level screen. Dashboard screens are reachable with 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    /// Sign in / create account. Not in the tab bar.
    #[default]
    Login,
    Overview, // 1
    Devices,  // 2
    Alerts,   // 3
    Agents,   // 4
    History,  // 5
}

impl ScreenId {
    /// Dashboard screens in tab-bar order.
    pub const ALL: [ScreenId; 5] = [
        Self::Overview,
        Self::Devices,
        Self::Alerts,
        Self::Agents,
        Self::History,
    ];

    /// Number key for this screen. Login has none.
    pub fn number(self) -> u8 {
        match self {
            Self::Login => 0,
            Self::Overview => 1,
            Self::Devices => 2,
            Self::Alerts => 3,
            Self::Agents => 4,
            Self::History => 5,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// Next dashboard screen (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL
            .get((idx + 1) % Self::ALL.len())
            .copied()
            .unwrap_or_default()
    }

    /// Previous dashboard screen (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL
            .get((idx + Self::ALL.len() - 1) % Self::ALL.len())
            .copied()
            .unwrap_or_default()
    }

    pub fn page(self) -> Option<Page> {
        match self {
            Self::Login => None,
            Self::Overview => Some(Page::Overview),
            Self::Devices => Some(Page::Devices),
            Self::Alerts => Some(Page::Alerts),
            Self::Agents => Some(Page::Agents),
            Self::History => Some(Page::History),
        }
    }

    pub fn route(self) -> Route {
        self.page().map_or(Route::Login, Route::Dashboard)
    }

    /// The screen showing `route`. Registration lives on the login screen.
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Login | Route::Register => Self::Login,
            Route::Dashboard(page) => Self::ALL
                .into_iter()
                .find(|s| s.page() == Some(page))
                .unwrap_or(Self::Overview),
        }
    }

    pub fn label(self) -> &'static str {
        let Some(page) = self.page() else {
            return "Login";
        };
        NAV_ITEMS
            .iter()
            .find(|item| item.page == page)
            .map_or("?", |item| item.label)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
