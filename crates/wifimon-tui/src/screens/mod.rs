//! Screen implementations. Each screen is a top-level Component that owns
//! one view from `wifimon_core::view` and fetches for it on a task.

pub mod agents;
pub mod alerts;
pub mod devices;
pub mod history;
pub mod login;
pub mod overview;

use wifimon_core::ApiClient;

use crate::component::Component;
use crate::screen::ScreenId;

/// One component per screen, login included.
pub fn create_screens(client: &ApiClient, stats_hours: u32) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Login, Box::new(login::LoginScreen::new(client.clone()))),
        (
            ScreenId::Overview,
            Box::new(overview::OverviewScreen::new(client.clone())),
        ),
        (
            ScreenId::Devices,
            Box::new(devices::DevicesScreen::new(client.clone(), stats_hours)),
        ),
        (ScreenId::Alerts, Box::new(alerts::AlertsScreen::new(client.clone()))),
        (ScreenId::Agents, Box::new(agents::AgentsScreen::new(client.clone()))),
        (
            ScreenId::History,
            Box::new(history::HistoryScreen::new(client.clone())),
        ),
    ]
}

/// A client whose requests go nowhere (port 9); tests never await one.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_client() -> ApiClient {
    let url = url::Url::parse("http://127.0.0.1:9/api/v1").unwrap();
    wifimon_core::ClientConfig::new(url).connect().unwrap()
}
