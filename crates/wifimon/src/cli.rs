//! Clap derive structures for the `wifimon` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Also
//! compiled by build.rs for man pages and completions, so it may only
//! depend on clap and clap_complete.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wifimon -- command-line client for the WiFi Monitor backend
#[derive(Debug, Parser)]
#[command(
    name = "wifimon",
    version,
    about = "Monitor WiFi devices, agents and alerts from the command line",
    long_about = "Talks to the WiFi Monitor REST API: log in once, then list devices,\n\
        inspect usage, set data caps, register scanning agents and manage alerts.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "WIFIMON_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL, e.g. http://localhost:5000/api/v1 (overrides profile)
    #[arg(long, short = 'u', env = "WIFIMON_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WIFIMON_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "WIFIMON_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the access token
    Login(CredentialArgs),

    /// Create an account
    Register(CredentialArgs),

    /// Forget the stored access token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Headline numbers and recent alerts
    #[command(alias = "ov")]
    Overview,

    /// Inspect devices, usage and data caps
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List and register scanning agents
    #[command(alias = "ag")]
    Agents(AgentsArgs),

    /// Manage alerts and view alert history
    #[command(alias = "al")]
    Alerts(AlertsArgs),

    /// Check backend health (no login needed)
    Health,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CredentialArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices seen by your agents
    #[command(alias = "ls")]
    List,

    /// Show one device
    Get {
        /// Device ID
        id: i64,
    },

    /// Usage samples for a device
    Stats {
        /// Device ID
        id: i64,

        /// Look-back window in hours (defaults to the profile's stats_hours)
        #[arg(long)]
        hours: Option<u32>,
    },

    /// Set or clear a device's data cap in bytes (empty string clears)
    SetCap {
        /// Device ID
        id: i64,

        /// Cap in bytes, or "" for no cap
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Delete a device
    #[command(alias = "rm")]
    Delete {
        /// Device ID
        id: i64,
    },

    /// Aggregated usage totals for a device
    Usage {
        /// Device ID
        id: i64,

        /// Window start (ISO-8601)
        #[arg(long)]
        start: Option<String>,

        /// Window end (ISO-8601)
        #[arg(long)]
        end: Option<String>,
    },
}

// ── Agents ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AgentsArgs {
    #[command(subcommand)]
    pub command: AgentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AgentsCommand {
    /// List your agents
    #[command(alias = "ls")]
    List,

    /// Register an agent and print its API key (shown only once)
    Register {
        /// Agent name
        name: String,
    },
}

// ── Alerts ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts
    #[command(alias = "ls")]
    List,

    /// Show one alert
    Get {
        /// Alert ID
        id: i64,
    },

    /// Create an alert
    Create {
        /// Alert title
        #[arg(long)]
        title: String,

        /// Threshold in MB/s
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        threshold: u32,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,

        /// Restrict to one device
        #[arg(long)]
        device: Option<i64>,
    },

    /// Change fields of an alert (only the given ones are sent)
    Update {
        /// Alert ID
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        threshold: Option<u32>,

        #[arg(long)]
        description: Option<String>,

        /// active or resolved (sent as --enabled true/false)
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        device: Option<i64>,

        /// Enable or disable the alert
        #[arg(long)]
        enabled: Option<bool>,
    },

    /// Triggered alerts over a recent window
    History {
        /// Look-back window in hours
        #[arg(long, default_value = "24")]
        hours: u32,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the current configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a profile value (api_url, token_store, timeout, stats_hours, ca_cert, insecure)
    Set {
        /// Setting key
        key: String,
        /// Value
        value: String,
    },

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
