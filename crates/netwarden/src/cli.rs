//! Clap derive structures for the `netwarden` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netwarden -- home network watchdog
#[derive(Debug, Parser)]
#[command(
    name = "netwarden",
    version,
    about = "Watch a home network for unknown devices",
    long_about = "Diffs the devices attached to your router against a reviewed \
        snapshot baseline.\n\n\
        New devices are reported, optionally blocked through the router's \
        access-control API,\nrecorded on a deny-list, and alerted on. Designed \
        to be run from cron or a systemd timer.",
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
    /// Device source backend (overrides the config file)
    #[arg(long, short = 'S', env = "NETWARDEN_SOURCE", global = true)]
    pub source: Option<SourceArg>,

    /// Path to the config file
    #[arg(long, env = "NETWARDEN_CONFIG", global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Directory holding the snapshot, deny-list, and alert marker
    #[arg(long, env = "NETWARDEN_DATA_DIR", global = true)]
    pub data_dir: Option<std::path::PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETWARDEN_OUTPUT",
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

    /// Request timeout in seconds
    #[arg(long, env = "NETWARDEN_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Netgear SOAP API (can block devices)
    Netgear,
    /// Residential gateway status page (report-only)
    Gateway,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
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
    /// Manage the snapshot baseline
    #[command(alias = "snap")]
    Snapshot(SnapshotArgs),

    /// Run one monitoring cycle against the snapshot
    #[command(alias = "run")]
    Monitor(MonitorArgs),

    /// Permanently whitelist a device (corrects snapshot and deny-list)
    Allow {
        /// Device name or MAC address; must be currently connected
        device: String,
    },

    /// One-shot device queries and access control
    #[command(alias = "dev")]
    Device(DeviceArgs),

    /// View the deny-list history
    Denylist(DenylistArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── SNAPSHOT ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: SnapshotCommand,
}

#[derive(Debug, Subcommand)]
pub enum SnapshotCommand {
    /// Capture the current device list as the new baseline
    ///
    /// Overwrites any existing snapshot. Review the file afterwards and
    /// remove devices you do not recognize.
    Create,

    /// Display the stored baseline
    Show,
}

// ── MONITOR ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Actively block unknown devices instead of only reporting them
    #[arg(long, short = 'b')]
    pub block: bool,

    /// Skip alert delivery for this cycle
    #[arg(long)]
    pub no_notify: bool,
}

// ── DEVICE ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// List devices currently attached to the network
    #[command(alias = "ls")]
    List,

    /// Grant internet access (router command only; stores untouched)
    Allow {
        /// Device name or MAC address
        device: String,
    },

    /// Revoke internet access (router command only; stores untouched)
    Block {
        /// Device name or MAC address
        device: String,
    },
}

// ── DENYLIST ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DenylistArgs {
    #[command(subcommand)]
    pub command: DenylistCommand,
}

#[derive(Debug, Subcommand)]
pub enum DenylistCommand {
    /// List every deny-list record
    #[command(alias = "ls")]
    List,
}

// ── CONFIG ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a commented starter config file
    Init,

    /// Display the resolved configuration
    Show,
}

// ── COMPLETIONS ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
