use tracing::{error, info};
use wifimon_api::{Agent, ApiClient, RegisteredAgent};

use crate::error::CoreError;
use crate::fetch::FetchState;

/// The "Register Agent" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentForm {
    pub open: bool,
    pub name: String,
}

impl AgentForm {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// The trimmed name, or an error for a blank field.
    pub fn validated_name(&self) -> Result<&str, CoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "agent name is required".into(),
            });
        }
        Ok(name)
    }

    fn reset(&mut self) {
        self.open = false;
        self.name.clear();
    }
}

#[derive(Debug, Default)]
pub struct AgentsView {
    agents: FetchState<Vec<Agent>>,
    pub form: AgentForm,
    registered: Option<RegisteredAgent>,
}

impl AgentsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        self.agents.begin();
    }

    pub fn finish_load(&mut self, result: Result<Vec<Agent>, CoreError>) {
        self.agents.finish("agents", result);
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.begin_load();
        let result = client.list_agents().await.map_err(CoreError::from);
        self.finish_load(result);
    }

    pub fn is_loading(&self) -> bool {
        self.agents.is_loading()
    }

    pub fn agents(&self) -> &[Agent] {
        self.agents.items()
    }

    /// Submit the form. On success the form is cleared, the one-time key
    /// is kept for display and the list is re-fetched. On failure the
    /// error is logged and nothing changes.
    pub async fn register(&mut self, client: &ApiClient) -> Result<RegisteredAgent, CoreError> {
        let name = self.form.validated_name()?.to_owned();
        match client.register_agent(&name).await {
            Ok(registered) => {
                self.registration_succeeded(registered.clone());
                self.load(client).await;
                Ok(registered)
            }
            Err(e) => {
                error!(error = %e, name = %name, "failed to register agent");
                Err(e.into())
            }
        }
    }

    /// Record a successful registration (the caller re-fetches the list).
    pub fn registration_succeeded(&mut self, registered: RegisteredAgent) {
        info!(id = registered.agent.id, name = %registered.agent.name, "agent registered");
        self.form.reset();
        self.registered = Some(registered);
    }

    /// The agent registered last in this view, with its one-time API key.
    pub fn last_registered(&self) -> Option<&RegisteredAgent> {
        self.registered.as_ref()
    }

    /// Forget the API key once it has been shown.
    pub fn dismiss_registered(&mut self) {
        self.registered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let form = AgentForm {
            open: true,
            name: "   ".into(),
        };
        assert!(matches!(
            form.validated_name(),
            Err(CoreError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn name_is_trimmed() {
        let form = AgentForm {
            open: true,
            name: " Living Room WiFi ".into(),
        };
        assert_eq!(form.validated_name().ok(), Some("Living Room WiFi"));
    }
}
