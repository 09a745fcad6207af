// Account endpoints: registration, login, identity, logout.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::client::{ApiClient, Scope};
use crate::error::Error;
use crate::models::{LoginResponse, User};

impl ApiClient {
    /// Create an account. Does not log in.
    ///
    /// `POST /auth/register`
    pub async fn register(&self, email: &str, password: &SecretString) -> Result<User, Error> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        self.post_one("auth/register", &body, Scope::Public)
            .await
            .map_err(reject_as_auth)
    }

    /// Exchange credentials for an access token and store it.
    ///
    /// `POST /auth/login`. On success the auth state becomes
    /// `Authenticated`; the token itself is never returned to the caller.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        debug!(email, "logging in");
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp: LoginResponse = self
            .post_raw("auth/login", &body, Scope::Public)
            .await
            .map_err(reject_as_auth)?;
        let token = resp
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingField("access_token"))?;

        self.store_token(&SecretString::from(token))?;
        info!(email, "login successful");
        Ok(())
    }

    /// The account behind the stored token.
    ///
    /// `GET /auth/me`
    pub async fn me(&self) -> Result<User, Error> {
        self.get_one("auth/me", &[]).await
    }

    /// Drop the stored token. Purely local: the backend keeps no session.
    pub fn logout(&self) -> Result<(), Error> {
        if self.clear_session()? {
            info!("logged out");
        }
        Ok(())
    }
}

/// The backend answers bad credentials / duplicate emails with 400.
fn reject_as_auth(err: Error) -> Error {
    match err {
        Error::Api { status: 400, message } => Error::Authentication { message },
        other => other,
    }
}
