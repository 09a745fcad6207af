//! CLI configuration: a thin layer over `wifimon_config` that applies
//! `GlobalOpts` overrides (--profile, --api-url, --timeout).

use std::time::Duration;

use wifimon_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use wifimon_config::{
    Config, ConfigError, Profile, config_path, load_config_or_default, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Pick the active profile and translate it, plus flag overrides, into a
/// `ClientConfig`. Flags beat environment beats profile.
pub fn resolve_profile(
    config: &Config,
    global: &GlobalOpts,
) -> Result<(String, ClientConfig), CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = config.profile(&profile_name).map_err(|e| match e {
        ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
            name: profile,
            available: available_profiles(config),
        },
        other => other.into(),
    })?;

    let mut client_config =
        wifimon_config::profile_to_client_config(&profile, &profile_name, &config.defaults)?;

    if let Some(ref url_str) = global.api_url {
        client_config.api_url = url_str.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        client_config.timeout = Duration::from_secs(secs);
    }

    Ok((profile_name, client_config))
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let names = config.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
