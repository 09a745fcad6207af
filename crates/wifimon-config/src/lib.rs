//! Shared configuration for the wifimon CLI and TUI.
//!
//! TOML profiles, platform paths for the config file and the persisted
//! access token, and translation to `wifimon_core::ClientConfig`. Both
//! binaries depend on this crate; the CLI layers its global flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wifimon_core::{ClientConfig, DEFAULT_BASE_URL, TlsVerification, TokenStorage};

/// Name of the profile used when nothing else is selected.
pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("unknown setting '{key}'")]
    UnknownKey { key: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_stats_hours")]
    pub stats_hours: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            stats_hours: default_stats_hours(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_stats_hours() -> u32 {
    wifimon_core::DEFAULT_STATS_HOURS
}

/// Where a profile keeps its access token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// `<data dir>/<profile>/access_token`
    #[default]
    File,
    /// OS keyring, service `wifimon`.
    Keyring,
    /// Not persisted; every run starts logged out.
    Memory,
}

impl std::str::FromStr for TokenStoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Validation {
                field: "token_store".into(),
                reason: format!("expected 'file', 'keyring', or 'memory', got '{other}'"),
            }),
        }
    }
}

/// A named API profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API root, e.g. "http://localhost:5000/api/v1".
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub token_store: TokenStoreKind,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override the request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override the device stats window (hours).
    pub stats_hours: Option<u32>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_store: TokenStoreKind::default(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            stats_hours: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.into()
}

impl Profile {
    /// Set one field from its TOML key and a string value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Validation {
            field: key.into(),
            reason,
        };
        match key {
            "api_url" => {
                url::Url::parse(value).map_err(|e| invalid(e.to_string()))?;
                self.api_url = value.into();
            }
            "token_store" => self.token_store = value.parse()?,
            "ca_cert" => self.ca_cert = Some(PathBuf::from(value)),
            "insecure" => {
                self.insecure = Some(value.parse().map_err(|_| invalid("expected true or false".into()))?);
            }
            "timeout" => {
                self.timeout = Some(value.parse().map_err(|_| invalid("expected seconds".into()))?);
            }
            "stats_hours" => {
                self.stats_hours = Some(value.parse().map_err(|_| invalid("expected hours".into()))?);
            }
            other => {
                return Err(ConfigError::UnknownKey { key: other.into() });
            }
        }
        Ok(())
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "wifimon")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Per-user data directory (token files, TUI log).
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Where a file-backed profile keeps its token.
pub fn token_path(profile_name: &str) -> PathBuf {
    data_dir()
        .join(profile_name)
        .join(wifimon_core::TOKEN_NAME)
}

fn dirs_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("wifimon");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. `WIFIMON_SECTION__KEY` variables override it.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WIFIMON_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

impl Config {
    /// The profile name to use: explicit choice, else `default_profile`, else "default".
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE)
            .to_owned()
    }

    /// Look up a profile. The default profile may be absent (built-in defaults apply).
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == DEFAULT_PROFILE => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile {
                profile: name.into(),
            }),
        }
    }

    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Build a `ClientConfig` from a profile, without CLI flag overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|e: url::ParseError| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{e}: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let token_storage = match profile.token_store {
        TokenStoreKind::File => TokenStorage::File(token_path(profile_name)),
        TokenStoreKind::Keyring => TokenStorage::Keyring {
            profile: profile_name.into(),
        },
        TokenStoreKind::Memory => TokenStorage::Memory,
    };

    let mut config = ClientConfig::new(api_url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.token_storage = token_storage;
    config.stats_hours = profile.stats_hours.unwrap_or(defaults.stats_hours);
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wifimon").join("config.toml");

        let mut cfg = Config::default();
        let mut lab = Profile::default();
        lab.set("api_url", "https://monitor.lab:8443/api/v1").unwrap();
        lab.set("token_store", "keyring").unwrap();
        lab.set("timeout", "5").unwrap();
        cfg.profiles.insert("lab".into(), lab);
        cfg.default_profile = Some("lab".into());

        save_config_to(&path, &cfg).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[profiles.home]\napi_url = \"http://10.0.0.2:5000/api/v1\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        let home = cfg.profile("home").unwrap();
        assert_eq!(home.token_store, TokenStoreKind::File);
        assert_eq!(home.timeout, None);
        assert_eq!(cfg.defaults.stats_hours, 24);
    }

    #[test]
    fn profile_resolution() {
        let cfg = Config::default();
        assert_eq!(cfg.profile_name(None), "default");
        assert_eq!(cfg.profile_name(Some("lab")), "lab");
        assert_eq!(cfg.profile("default").unwrap(), Profile::default());
        assert!(matches!(
            cfg.profile("lab"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn client_config_from_profile() {
        let profile = Profile {
            insecure: Some(true),
            stats_hours: Some(6),
            token_store: TokenStoreKind::Memory,
            ..Profile::default()
        };
        let client = profile_to_client_config(&profile, "default", &Defaults::default()).unwrap();
        assert_eq!(client.api_url.as_str(), "http://localhost:5000/api/v1");
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.stats_hours, 6);
        assert!(matches!(client.tls, TlsVerification::DangerAcceptInvalid));
        assert!(matches!(client.token_storage, TokenStorage::Memory));
    }

    #[test]
    fn bad_values_are_rejected() {
        let mut profile = Profile::default();
        assert!(profile.set("api_url", "not a url").is_err());
        assert!(profile.set("token_store", "cookie").is_err());
        assert!(profile.set("timeout", "soon").is_err());
        assert!(matches!(
            profile.set("colour", "red"),
            Err(ConfigError::UnknownKey { .. })
        ));
    }

    #[test]
    fn file_profiles_store_token_per_profile() {
        let path = token_path("lab");
        assert!(path.ends_with("lab/access_token"));
    }
}
