// REST client for the wifimon backend
//
// Wraps `reqwest::Client` with base-URL joining, bearer injection from the
// token store, `{status, data}` envelope unwrapping and the single central
// 401 handler. Endpoint groups (auth, devices, agents, alerts, system) are
// inherent methods in separate files.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::models::{Envelope, ErrorBody};
use crate::token::TokenStore;
use crate::transport::TransportConfig;

/// Default API root when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v1";

/// Whether the client currently holds a usable session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

/// Whether a request carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Login / registration: never sends a token.
    Public,
    /// Everything else.
    Session,
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the wifimon REST API.
///
/// Cheap to clone; clones share the HTTP pool, the token store and the
/// auth-state channel. Any 401 clears the stored token and moves the auth
/// state to [`AuthState::Unauthenticated`]. Subscribers see that transition
/// once, however many requests are rejected.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    auth_tx: watch::Sender<AuthState>,
    timeout_secs: u64,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("auth", &*self.inner.auth_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ────────────────────────────────────────────────

    /// Build a client with its own HTTP pool from a transport config.
    pub fn new(
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::build(base_url, http, tokens, transport.timeout.as_secs())
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, Error> {
        Self::build(
            base_url,
            http,
            tokens,
            TransportConfig::default().timeout.as_secs(),
        )
    }

    fn build(
        base_url: &str,
        http: reqwest::Client,
        tokens: Arc<dyn TokenStore>,
        timeout_secs: u64,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        let initial = if tokens.load()?.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        let (auth_tx, _) = watch::channel(initial);

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                tokens,
                auth_tx,
                timeout_secs,
            }),
        })
    }

    /// Ensure a trailing slash so relative joins keep the `/api/v1` prefix.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw.trim())?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The API root (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn auth_state(&self) -> AuthState {
        *self.inner.auth_tx.borrow()
    }

    /// Watch auth transitions. A 401 anywhere shows up here as a single
    /// change to `Unauthenticated`.
    pub fn subscribe_auth(&self) -> watch::Receiver<AuthState> {
        self.inner.auth_tx.subscribe()
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    /// Whether a token is currently stored (not whether it is valid).
    pub fn has_token(&self) -> Result<bool, Error> {
        Ok(self.inner.tokens.load()?.is_some())
    }

    // ── Session state ───────────────────────────────────────────────

    pub(crate) fn store_token(&self, token: &SecretString) -> Result<(), Error> {
        self.inner.tokens.save(token)?;
        self.set_auth_state(AuthState::Authenticated);
        Ok(())
    }

    /// Forget the stored token and drop to `Unauthenticated`.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn clear_session(&self) -> Result<bool, Error> {
        self.inner.tokens.clear()?;
        Ok(self.set_auth_state(AuthState::Unauthenticated))
    }

    fn set_auth_state(&self, next: AuthState) -> bool {
        self.inner.auth_tx.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        })
    }

    /// Central 401 handling: clear the token, transition once, classify.
    fn on_unauthorized(&self, scope: Scope, sent_token: bool, message: Option<String>) -> Error {
        if let Err(e) = self.inner.tokens.clear() {
            warn!(error = %e, "failed to clear rejected access token");
        }
        if self.set_auth_state(AuthState::Unauthenticated) {
            warn!("access token rejected; session cleared");
        }

        match (scope, sent_token) {
            (Scope::Public, _) => Error::Authentication {
                message: message.unwrap_or_else(|| "invalid credentials".into()),
            },
            (Scope::Session, true) => Error::SessionExpired,
            (Scope::Session, false) => Error::NotAuthenticated,
        }
    }

    // ── URL builder ─────────────────────────────────────────────────

    /// Join a relative path (e.g. `"devices/3/stats"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request execution ───────────────────────────────────────────

    /// Attach auth (per scope), send, and turn non-2xx into errors.
    async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
        scope: Scope,
    ) -> Result<reqwest::Response, Error> {
        let mut builder = builder;
        let mut sent_token = false;
        if scope == Scope::Session {
            if let Some(token) = self.inner.tokens.load()? {
                builder = builder.bearer_auth(token.expose_secret());
                sent_token = true;
            }
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.inner.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(ErrorBody::into_message);

        if status == StatusCode::UNAUTHORIZED {
            return Err(self.on_unauthorized(scope, sent_token, message));
        }

        Err(Error::Api {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                }
            }),
        })
    }

    /// Decode a success body. A blank body (204) reads as `{}`.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await?;
        let text = if body.trim().is_empty() { "{}" } else { &body };
        serde_json::from_str(text).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    // ── HTTP verbs ──────────────────────────────────────────────────

    /// GET returning the raw decoded body (no envelope).
    pub(crate) async fn get_raw<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self
            .execute(self.inner.http.get(url), Scope::Session)
            .await?;
        Self::decode(resp).await
    }

    /// GET a list endpoint; absent or `null` `data` is an empty list.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .execute(self.inner.http.get(url).query(params), Scope::Session)
            .await?;
        let envelope: Envelope<Vec<T>> = Self::decode(resp).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// GET a single resource from the `data` field.
    pub(crate) async fn get_one<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .execute(self.inner.http.get(url).query(params), Scope::Session)
            .await?;
        let envelope: Envelope<T> = Self::decode(resp).await?;
        envelope.data.ok_or(Error::MissingField("data"))
    }

    /// POST with a JSON body, returning the full decoded body.
    pub(crate) async fn post_raw<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        scope: Scope,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .execute(self.inner.http.post(url).json(body), scope)
            .await?;
        Self::decode(resp).await
    }

    /// POST with a JSON body, returning `data`.
    pub(crate) async fn post_one<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        scope: Scope,
    ) -> Result<T, Error> {
        let envelope: Envelope<T> = self.post_raw(path, body, scope).await?;
        envelope.data.ok_or(Error::MissingField("data"))
    }

    /// PUT with a JSON body, returning `data`.
    pub(crate) async fn put_one<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .execute(self.inner.http.put(url).json(body), Scope::Session)
            .await?;
        let envelope: Envelope<T> = Self::decode(resp).await?;
        envelope.data.ok_or(Error::MissingField("data"))
    }

    /// DELETE, ignoring any body.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        self.execute(self.inner.http.delete(url), Scope::Session)
            .await?;
        Ok(())
    }
}
