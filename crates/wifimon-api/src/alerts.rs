// Alert rule and alert history endpoints.

use crate::client::{ApiClient, Scope};
use crate::error::Error;
use crate::models::{Alert, AlertDraft, AlertHistoryEntry};

impl ApiClient {
    /// `GET /alerts`
    pub async fn list_alerts(&self) -> Result<Vec<Alert>, Error> {
        self.get_list("alerts", &[]).await
    }

    /// `GET /alerts/{id}`
    pub async fn get_alert(&self, id: i64) -> Result<Alert, Error> {
        self.get_one(&format!("alerts/{id}"), &[]).await
    }

    /// `POST /alerts`
    pub async fn create_alert(&self, draft: &AlertDraft) -> Result<Alert, Error> {
        self.post_one("alerts", draft, Scope::Session).await
    }

    /// Partial update; only the fields set on `draft` are sent.
    ///
    /// `PUT /alerts/{id}`
    pub async fn update_alert(&self, id: i64, draft: &AlertDraft) -> Result<Alert, Error> {
        self.put_one(&format!("alerts/{id}"), draft).await
    }

    /// Breaches recorded over the last `hours`.
    ///
    /// `GET /alerts/history?hours=N`
    pub async fn alert_history(&self, hours: u32) -> Result<Vec<AlertHistoryEntry>, Error> {
        self.get_list("alerts/history", &[("hours", hours.to_string())])
            .await
    }
}
