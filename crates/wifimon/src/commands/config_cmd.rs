//! Config subcommand handlers.

use dialoguer::{Input, Select};

use super::util::prompt_err;
use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const TOKEN_STORES: [&str; 3] = ["file", "keyring", "memory"];

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("WiFi Monitor CLI -- configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(config::active_profile_name(global, &cfg))
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(wifimon_core::DEFAULT_BASE_URL.into())
                .interact_text()
                .map_err(prompt_err)?;

            let store = Select::new()
                .with_prompt("Where should the access token be kept?")
                .items(&[
                    "File in the data directory (default)",
                    "System keyring",
                    "Nowhere (log in every run)",
                ])
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile::default();
            profile.set("api_url", &api_url)?;
            profile.set("token_store", TOKEN_STORES.get(store).copied().unwrap_or("file"))?;

            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: wifimon login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.profile_names().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            cfg.profiles
                .entry(profile_name.clone())
                .or_default()
                .set(&key.replace('-', "_"), &value)
                .map_err(|e| match e {
                    config::ConfigError::UnknownKey { key } => CliError::Validation {
                        reason: format!(
                            "unknown config key '{key}'. Valid keys: api_url, token_store, \
                             timeout, stats_hours, ca_cert, insecure"
                        ),
                        field: key,
                    },
                    other => other.into(),
                })?;

            config::save_config(&cfg)?;
            output::notice(
                &format!("✓ Set {key} on profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::notice(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}
