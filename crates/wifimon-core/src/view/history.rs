use wifimon_api::{AlertHistoryEntry, ApiClient};

use crate::error::CoreError;
use crate::fetch::FetchState;

/// Default look-back for the history page.
pub const DEFAULT_HISTORY_HOURS: u32 = 24;

/// Recorded alert breaches over a look-back window.
#[derive(Debug)]
pub struct AlertHistoryView {
    entries: FetchState<Vec<AlertHistoryEntry>>,
    hours: u32,
}

impl Default for AlertHistoryView {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_HOURS)
    }
}

impl AlertHistoryView {
    pub fn new(hours: u32) -> Self {
        Self {
            entries: FetchState::Idle,
            hours,
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// Change the window; takes effect on the next load.
    pub fn set_hours(&mut self, hours: u32) {
        self.hours = hours.max(1);
    }

    pub fn begin_load(&mut self) {
        self.entries.begin();
    }

    pub fn finish_load(&mut self, result: Result<Vec<AlertHistoryEntry>, CoreError>) {
        self.entries.finish("alert history", result);
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.begin_load();
        let result = client
            .alert_history(self.hours)
            .await
            .map_err(CoreError::from);
        self.finish_load(result);
    }

    pub fn is_loading(&self) -> bool {
        self.entries.is_loading()
    }

    pub fn entries(&self) -> &[AlertHistoryEntry] {
        self.entries.items()
    }

    /// Entries not yet resolved.
    pub fn open_count(&self) -> usize {
        self.entries()
            .iter()
            .filter(|e| e.resolved_at.is_none())
            .count()
    }
}
