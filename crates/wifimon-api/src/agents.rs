// Collector agent endpoints.

use serde_json::json;

use crate::client::{ApiClient, Scope};
use crate::error::Error;
use crate::models::{Agent, RegisteredAgent};

impl ApiClient {
    /// `GET /agents`
    pub async fn list_agents(&self) -> Result<Vec<Agent>, Error> {
        self.get_list("agents", &[]).await
    }

    /// Register a new agent. The returned API key is not retrievable later.
    ///
    /// `POST /agents/register`
    pub async fn register_agent(&self, name: &str) -> Result<RegisteredAgent, Error> {
        self.post_one("agents/register", &json!({ "name": name }), Scope::Session)
            .await
    }
}
