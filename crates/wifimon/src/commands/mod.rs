//! Command dispatch: bridges CLI args -> API/view calls -> output formatting.

pub mod agents;
pub mod alerts;
pub mod auth;
pub mod config_cmd;
pub mod devices;
pub mod health;
pub mod overview;
pub mod util;

use wifimon_core::ApiClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Everything a handler needs once the profile is resolved.
pub struct Ctx<'a> {
    pub client: ApiClient,
    pub profile: String,
    /// Default window for `devices stats`.
    pub stats_hours: u32,
    pub global: &'a GlobalOpts,
}

/// Dispatch an API-bound command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Ctx<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(ctx, args).await,
        Command::Register(args) => auth::register(ctx, args).await,
        Command::Logout => auth::logout(ctx),
        Command::Whoami => auth::whoami(ctx).await,
        Command::Health => health::handle(ctx).await,
        Command::Overview => overview::handle(ctx).await,
        Command::Devices(args) => devices::handle(ctx, args).await,
        Command::Agents(args) => agents::handle(ctx, args).await,
        Command::Alerts(args) => alerts::handle(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
