use wifimon_api::{Alert, AlertStatus, ApiClient};

use crate::error::CoreError;
use crate::fetch::FetchState;

#[derive(Debug, Default)]
pub struct AlertsView {
    alerts: FetchState<Vec<Alert>>,
}

impl AlertsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        self.alerts.begin();
    }

    pub fn finish_load(&mut self, result: Result<Vec<Alert>, CoreError>) {
        self.alerts.finish("alerts", result);
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.begin_load();
        let result = client.list_alerts().await.map_err(CoreError::from);
        self.finish_load(result);
    }

    pub fn is_loading(&self) -> bool {
        self.alerts.is_loading()
    }

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.items()
    }

    pub fn count_with(&self, status: &AlertStatus) -> usize {
        self.alerts().iter().filter(|a| &a.status == status).count()
    }
}
