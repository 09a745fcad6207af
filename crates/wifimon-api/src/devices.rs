// Device endpoints: listing, detail, usage samples and cap edits.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Device, DeviceCapUpdate, DeviceStat, DeviceUsage};

/// Window used by the dashboard when none is given.
pub const DEFAULT_STATS_HOURS: u32 = 24;

impl ApiClient {
    /// `GET /devices`
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        self.get_list("devices", &[]).await
    }

    /// `GET /devices/{id}`
    pub async fn get_device(&self, id: i64) -> Result<Device, Error> {
        self.get_one(&format!("devices/{id}"), &[]).await
    }

    /// Usage samples for one device over the last `hours`.
    ///
    /// `GET /devices/{id}/stats?hours=N`
    pub async fn device_stats(&self, id: i64, hours: u32) -> Result<Vec<DeviceStat>, Error> {
        self.get_list(
            &format!("devices/{id}/stats"),
            &[("hours", hours.to_string())],
        )
        .await
    }

    /// Set (`Some`) or clear (`None`) a device's data cap in bytes.
    ///
    /// `PUT /devices/{id}` with `{"data_cap": N | null}`
    pub async fn set_device_cap(&self, id: i64, cap: Option<u64>) -> Result<Device, Error> {
        self.put_one(&format!("devices/{id}"), &DeviceCapUpdate { data_cap: cap })
            .await
    }

    /// `DELETE /devices/{id}`
    pub async fn delete_device(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("devices/{id}")).await
    }

    /// Aggregated usage, optionally bounded by ISO-8601 `start`/`end`.
    ///
    /// `GET /usage/device/{id}`
    pub async fn device_usage(
        &self,
        id: i64,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<DeviceUsage, Error> {
        let mut params = Vec::new();
        if let Some(start) = start {
            params.push(("start", start.to_owned()));
        }
        if let Some(end) = end {
            params.push(("end", end.to_owned()));
        }
        self.get_one(&format!("usage/device/{id}"), &params).await
    }
}
