// Access-token persistence.
//
// The bearer token is the only piece of state shared across views. It is
// read on every outgoing request and cleared centrally on 401 or logout.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;

/// Name under which the access token is persisted.
pub const TOKEN_NAME: &str = "access_token";

/// Somewhere to keep the bearer token between requests (and runs).
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Current token, or `None` when logged out.
    fn load(&self) -> Result<Option<SecretString>, Error>;

    /// Replace the stored token.
    fn save(&self, token: &SecretString) -> Result<(), Error>;

    /// Forget the token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), Error>;
}

// ── Memory ──────────────────────────────────────────────────────────

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(SecretString::from(token.into()))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<SecretString>>, Error> {
        self.token
            .lock()
            .map_err(|_| Error::TokenStore("token lock poisoned".into()))
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTokenStore").finish_non_exhaustive()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, Error> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, token: &SecretString) -> Result<(), Error> {
        *self.lock()? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.lock()? = None;
        Ok(())
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Token kept in a single file (owner read/write only on unix).
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(token.to_owned())))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::TokenStore(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::TokenStore(format!("failed to create {}: {e}", parent.display())))?;
        }
        std::fs::write(&self.path, token.expose_secret())
            .map_err(|e| Error::TokenStore(format!("failed to write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| Error::TokenStore(format!("failed to chmod token file: {e}")))?;
        }

        debug!(path = %self.path.display(), "access token saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "access token removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::TokenStore(format!(
                "failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Token kept in the OS keyring under service `wifimon`, entry `<profile>/access_token`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    profile: String,
}

impl KeyringTokenStore {
    pub const SERVICE: &'static str = "wifimon";

    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, Error> {
        keyring::Entry::new(Self::SERVICE, &format!("{}/{TOKEN_NAME}", self.profile))
            .map_err(|e| Error::TokenStore(format!("keyring unavailable: {e}")))
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SecretString>, Error> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(Some(SecretString::from(secret))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Error::TokenStore(format!("keyring read failed: {e}"))),
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), Error> {
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(|e| Error::TokenStore(format!("keyring write failed: {e}")))
    }

    fn clear(&self) -> Result<(), Error> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Error::TokenStore(format!("keyring delete failed: {e}"))),
        }
    }
}
