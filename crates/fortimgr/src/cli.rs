//! Clap derive structures for the `fortimgr` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fortimgr -- read-only FortiManager queries from the command line
#[derive(Debug, Parser)]
#[command(
    name = "fortimgr",
    version,
    about = "Query FortiManager-managed FortiGate devices from the command line",
    long_about = "Read-only queries against a FortiManager over its JSON-RPC API.\n\n\
        Lists ADOMs and devices, stored interface configuration, and live\n\
        IPsec tunnel and SD-WAN health-check state proxied to each device.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "FMG_PROFILE", global = true)]
    pub profile: Option<String>,

    /// FortiManager host or URL (overrides profile)
    #[arg(long, short = 'H', env = "FMG_HOST", global = true)]
    pub host: Option<String>,

    /// REST API admin key
    #[arg(long, env = "FMG_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FMG_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FMG_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile; default 30)
    #[arg(long, env = "FMG_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Retries after a transient "no permission" (-11) reply (overrides profile)
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Seconds between retries (overrides profile)
    #[arg(long, global = true)]
    pub retry_delay: Option<u64>,
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
    /// List administrative domains (ADOMs)
    #[command(alias = "adom")]
    Adoms,

    /// List devices managed in an ADOM
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Find a device by name across all ADOMs
    Find(FindArgs),

    /// Show a device's stored interface configuration
    #[command(alias = "if")]
    Interfaces(DeviceArgs),

    /// Show live IPsec tunnel state of a device
    #[command(alias = "vpn")]
    Tunnels(DeviceArgs),

    /// Show live SD-WAN health-check state of a device
    #[command(alias = "sla")]
    Health(DeviceArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INVENTORY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// ADOM to list
    #[arg(long, short = 'a', default_value = "root")]
    pub adom: String,
}

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Device name (exact match)
    pub device: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICE STATE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Arguments shared by every per-device query.
#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// ADOM owning the device
    #[arg(long, short = 'a', default_value = "root")]
    pub adom: String,

    /// Device name
    pub device: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the API key or password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
