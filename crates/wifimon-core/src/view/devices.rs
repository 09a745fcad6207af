use tracing::{debug, info, warn};
use wifimon_api::{ApiClient, Device, DeviceStat};

use crate::cap::{CapInput, parse_cap};
use crate::error::CoreError;
use crate::fetch::FetchState;

/// Samples shown in the usage chart.
pub const RECENT_STATS: usize = 10;

/// Identifies one stats request so late responses can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    pub device_id: i64,
    generation: u64,
}

/// Device list with a selected device and its usage samples.
///
/// Stats are fetched per selection. A response is kept only if it answers
/// the most recent selection; anything older is dropped, whatever order
/// the responses arrive in.
#[derive(Debug, Default)]
pub struct DevicesView {
    devices: FetchState<Vec<Device>>,
    selected: Option<i64>,
    stats: FetchState<Vec<DeviceStat>>,
    generation: u64,
}

impl DevicesView {
    pub fn new() -> Self {
        Self::default()
    }

    // ── List ────────────────────────────────────────────────────────

    pub fn begin_load(&mut self) {
        self.devices.begin();
    }

    /// Apply a device-list fetch.
    ///
    /// When nothing valid is selected afterwards, the first device is
    /// selected and the returned ticket must be used to fetch its stats.
    pub fn finish_load(&mut self, result: Result<Vec<Device>, CoreError>) -> Option<DetailTicket> {
        self.devices.finish("devices", result);

        let still_there = self
            .selected
            .is_some_and(|id| self.devices.items().iter().any(|d| d.id == id));
        if still_there {
            return None;
        }

        match self.devices.items().first().map(|d| d.id) {
            Some(first) => Some(self.select(first)),
            None => {
                self.selected = None;
                self.stats = FetchState::Idle;
                None
            }
        }
    }

    /// Fetch the list, then the stats of whatever ends up selected.
    pub async fn load(&mut self, client: &ApiClient, hours: u32) {
        self.begin_load();
        let result = client.list_devices().await.map_err(CoreError::from);
        if let Some(ticket) = self.finish_load(result) {
            let stats = Self::fetch_stats(client, ticket, hours).await;
            self.apply_stats(ticket, stats);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.devices.is_loading()
    }

    pub fn devices(&self) -> &[Device] {
        self.devices.items()
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Select a device and get the ticket for its stats request.
    pub fn select(&mut self, device_id: i64) -> DetailTicket {
        self.generation += 1;
        self.selected = Some(device_id);
        self.stats.reset_loading();
        debug!(device_id, generation = self.generation, "device selected");
        DetailTicket {
            device_id,
            generation: self.generation,
        }
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Device> {
        let id = self.selected?;
        self.devices.items().iter().find(|d| d.id == id)
    }

    /// Index of the selected device in the list.
    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.devices.items().iter().position(|d| d.id == id)
    }

    // ── Stats ───────────────────────────────────────────────────────

    pub async fn fetch_stats(
        client: &ApiClient,
        ticket: DetailTicket,
        hours: u32,
    ) -> Result<Vec<DeviceStat>, CoreError> {
        Ok(client.device_stats(ticket.device_id, hours).await?)
    }

    /// Apply a stats response. Returns `false` if it was stale and dropped.
    pub fn apply_stats(
        &mut self,
        ticket: DetailTicket,
        result: Result<Vec<DeviceStat>, CoreError>,
    ) -> bool {
        if self.selected != Some(ticket.device_id) || ticket.generation != self.generation {
            debug!(
                device_id = ticket.device_id,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale stats response"
            );
            return false;
        }
        self.stats.finish("device stats", result);
        true
    }

    pub fn stats_loading(&self) -> bool {
        self.stats.is_loading()
    }

    /// All samples for the selected device.
    pub fn stats(&self) -> &[DeviceStat] {
        self.stats.items()
    }

    /// The last few samples, oldest first.
    pub fn recent_stats(&self) -> &[DeviceStat] {
        let stats = self.stats();
        &stats[stats.len().saturating_sub(RECENT_STATS)..]
    }

    // ── Cap edit ────────────────────────────────────────────────────

    /// Validate and write a data cap, then refresh the list.
    ///
    /// Invalid input fails with `ValidationFailed` before any request is
    /// made. A failed write leaves the view untouched.
    pub async fn save_cap(
        &mut self,
        client: &ApiClient,
        device_id: i64,
        raw: &str,
        hours: u32,
    ) -> Result<Device, CoreError> {
        let cap = parse_cap(raw).inspect_err(|e| warn!(device_id, "{e}"))?;
        let device = Self::write_cap(client, device_id, cap).await?;
        self.load(client, hours).await;
        Ok(device)
    }

    /// The write half of a cap edit (no validation, no refresh).
    pub async fn write_cap(
        client: &ApiClient,
        device_id: i64,
        cap: CapInput,
    ) -> Result<Device, CoreError> {
        let device = client.set_device_cap(device_id, cap.as_option()).await?;
        info!(device_id, cap = ?device.data_cap, "data cap updated");
        Ok(device)
    }
}
