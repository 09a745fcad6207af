//! Route guarding.
//!
//! Every navigation asks the gate where the user may go. Login and
//! registration are open; the dashboard needs a stored token that the
//! backend still accepts.

use strum::{Display, EnumIter};
use tracing::{debug, info, warn};
use wifimon_api::{ApiClient, User};

/// Dashboard sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Page {
    Overview,
    Devices,
    Agents,
    Alerts,
    History,
}

/// Where the user is (or wants to be).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard(Page),
}

impl Route {
    pub const HOME: Self = Self::Dashboard(Page::Overview);

    /// Login and registration; reachable without a session.
    pub fn is_auth_route(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard(Page::Overview) => "/dashboard",
            Self::Dashboard(Page::Devices) => "/dashboard/devices",
            Self::Dashboard(Page::Agents) => "/dashboard/agents",
            Self::Dashboard(Page::Alerts) => "/dashboard/alerts",
            Self::Dashboard(Page::History) => "/dashboard/alerts/history",
        }
    }
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Stay,
    Redirect(Route),
}

/// Two-state gate (anonymous / signed in) in front of every route.
#[derive(Debug)]
pub struct AuthGate {
    client: ApiClient,
    user: Option<User>,
}

impl AuthGate {
    pub fn new(client: ApiClient) -> Self {
        Self { client, user: None }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The account validated by the last check.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Decide what happens when navigating to `route`.
    ///
    /// With a stored token this validates it against `GET /auth/me`; a
    /// rejected (or unverifiable) token is cleared.
    pub async fn check(&mut self, route: Route) -> GateDecision {
        let has_token = self.client.has_token().unwrap_or_else(|e| {
            warn!(error = %e, "token store unreadable; treating as logged out");
            false
        });

        if !has_token {
            self.user = None;
            return if route.is_auth_route() {
                GateDecision::Stay
            } else {
                debug!(to = route.path(), "no token; redirecting to login");
                GateDecision::Redirect(Route::Login)
            };
        }

        match self.client.me().await {
            Ok(user) => {
                debug!(email = %user.email, "session valid");
                self.user = Some(user);
                if route.is_auth_route() {
                    GateDecision::Redirect(Route::HOME)
                } else {
                    GateDecision::Stay
                }
            }
            Err(e) => {
                warn!(error = %e, "session check failed");
                self.user = None;
                if let Err(e) = self.client.clear_session() {
                    warn!(error = %e, "failed to clear session");
                }
                if route == Route::Login {
                    GateDecision::Stay
                } else {
                    GateDecision::Redirect(Route::Login)
                }
            }
        }
    }

    /// Mark the session as established after a successful login.
    pub fn signed_in(&mut self, user: User) {
        info!(email = %user.email, "signed in");
        self.user = Some(user);
    }

    /// Drop the session (explicit logout or a 401 seen elsewhere).
    pub fn sign_out(&mut self) -> GateDecision {
        self.user = None;
        if let Err(e) = self.client.logout() {
            warn!(error = %e, "failed to clear session");
        }
        GateDecision::Redirect(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_routes() {
        assert!(Route::Login.is_auth_route());
        assert!(Route::Register.is_auth_route());
        assert!(!Route::HOME.is_auth_route());
        assert_eq!(Route::Dashboard(Page::Devices).path(), "/dashboard/devices");
    }
}
