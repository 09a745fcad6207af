use wifimon_api::{Agent, Alert, ApiClient, Device};

use crate::error::CoreError;
use crate::fetch::FetchState;
use crate::present::{StatCard, stat_cards};

/// Alerts listed under the stat cards.
pub const RECENT_ALERTS: usize = 5;

/// The three independent reads behind the overview, settled together.
#[derive(Debug)]
pub struct OverviewFetch {
    pub devices: Result<Vec<Device>, CoreError>,
    pub agents: Result<Vec<Agent>, CoreError>,
    pub alerts: Result<Vec<Alert>, CoreError>,
}

impl OverviewFetch {
    /// Issue all three list requests concurrently and wait for each to settle.
    pub async fn run(client: &ApiClient) -> Self {
        let (devices, agents, alerts) = tokio::join!(
            client.list_devices(),
            client.list_agents(),
            client.list_alerts(),
        );
        Self {
            devices: devices.map_err(CoreError::from),
            agents: agents.map_err(CoreError::from),
            alerts: alerts.map_err(CoreError::from),
        }
    }
}

/// Dashboard landing page: stat cards, device table, recent alerts.
#[derive(Debug, Default)]
pub struct OverviewView {
    devices: FetchState<Vec<Device>>,
    agents: FetchState<Vec<Agent>>,
    alerts: FetchState<Vec<Alert>>,
}

impl OverviewView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        self.devices.begin();
        self.agents.begin();
        self.alerts.begin();
    }

    /// Apply a settled fetch. Each part succeeds or falls back on its own.
    pub fn apply(&mut self, fetch: OverviewFetch) {
        self.devices.finish("devices", fetch.devices);
        self.agents.finish("agents", fetch.agents);
        self.alerts.finish("alerts", fetch.alerts);
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.begin_load();
        let fetch = OverviewFetch::run(client).await;
        self.apply(fetch);
    }

    pub fn is_loading(&self) -> bool {
        self.devices.is_loading() || self.agents.is_loading() || self.alerts.is_loading()
    }

    pub fn devices(&self) -> &[Device] {
        self.devices.items()
    }

    pub fn agents(&self) -> &[Agent] {
        self.agents.items()
    }

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.items()
    }

    /// First few alerts, in backend order.
    pub fn recent_alerts(&self) -> &[Alert] {
        let alerts = self.alerts();
        &alerts[..alerts.len().min(RECENT_ALERTS)]
    }

    pub fn cards(&self) -> [StatCard; 4] {
        stat_cards(self.devices(), self.agents().len(), self.alerts())
    }
}
