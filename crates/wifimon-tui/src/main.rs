//! `wifimon-tui` -- terminal dashboard for the wifimon usage monitor.
//!
//! Built on [ratatui](https://ratatui.rs). Screens are reachable with the
//! number keys (1-5): Overview, Devices, Alerts, Agents and History. The
//! login screen takes over whenever there is no valid session.
//!
//! Logs go to a file (default `<data dir>/wifimon-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod session;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wifimon_core::ClientConfig;

use crate::app::App;

/// Terminal dashboard for the wifimon WiFi usage monitor.
#[derive(Parser, Debug)]
#[command(name = "wifimon-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short = 'p', long, env = "WIFIMON_PROFILE")]
    profile: Option<String>,

    /// API base URL (overrides the profile)
    #[arg(short = 'u', long, env = "WIFIMON_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides the profile)
    #[arg(long, env = "WIFIMON_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path (defaults to wifimon-tui.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may be logged to stdout/stderr while the
/// terminal is in raw mode. The guard must live until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wifimon_tui={log_level},wifimon_core={log_level},wifimon_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| wifimon_config::data_dir().join("wifimon-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("wifimon-tui.log"));

    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the client config: flags > environment > profile > defaults.
fn build_client_config(cli: &Cli) -> Result<(String, ClientConfig)> {
    let cfg = wifimon_config::load_config_or_default();
    let profile_name = cfg.profile_name(cli.profile.as_deref());
    let profile = cfg.profile(&profile_name)?;
    let mut client_config =
        wifimon_config::profile_to_client_config(&profile, &profile_name, &cfg.defaults)?;

    if let Some(ref raw) = cli.api_url {
        client_config.api_url =
            url::Url::parse(raw).wrap_err_with(|| format!("invalid API URL: {raw}"))?;
    }
    if let Some(secs) = cli.timeout {
        client_config.timeout = Duration::from_secs(secs);
    }
    Ok((profile_name, client_config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first, so a failure during setup still restores the terminal.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let (profile, client_config) = build_client_config(&cli)?;
    info!(
        profile = %profile,
        api_url = %client_config.api_url,
        "starting wifimon-tui"
    );

    let client = client_config.connect()?;
    let mut app = App::new(client, client_config.stats_hours);
    app.run().await?;

    Ok(())
}
