use crate::client::ApiClient;
use crate::error::Error;
use crate::models::Health;

impl ApiClient {
    /// Backend liveness. Not wrapped in the `data` envelope.
    ///
    /// `GET /system/health`
    pub async fn health(&self) -> Result<Health, Error> {
        self.get_raw("system/health").await
    }
}
