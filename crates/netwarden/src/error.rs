//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help
//! text and stable exit codes for cron/systemd wrappers.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use netwarden_core::CoreError;

/// Exit codes, stable across releases so schedulers can branch on them.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the device source")]
    #[diagnostic(
        code(netwarden::connection_failed),
        help(
            "Check that the router is reachable from this machine.\n\
             Reason: {message}"
        )
    )]
    ConnectionFailed { message: String },

    #[error("Device source timed out")]
    #[diagnostic(
        code(netwarden::timeout),
        help("Increase the timeout with --timeout or check the router's responsiveness.")
    )]
    Timeout { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Router authentication failed")]
    #[diagnostic(
        code(netwarden::auth_failed),
        help(
            "Verify the admin password for your router.\n\
             Set it in the config file under [netgear], or export \
             NETWARDEN_NETGEAR__PASSWORD.\nReason: {message}"
        )
    )]
    AuthFailed { message: String },

    #[error("No router password configured for the {backend} backend")]
    #[diagnostic(
        code(netwarden::no_credentials),
        help(
            "Add 'password' under [{backend}] in the config file \
             (run: netwarden config init),\nor export NETWARDEN_NETGEAR__PASSWORD."
        )
    )]
    NoCredentials { backend: &'static str },

    // ── Device source ────────────────────────────────────────────────
    #[error("The {backend} backend returned no devices")]
    #[diagnostic(
        code(netwarden::no_devices),
        help(
            "An empty device list almost always means the router rejected the \
             credentials.\nCheck the configured password and URL."
        )
    )]
    NoDevices { backend: &'static str },

    #[error("Device '{identifier}' is not connected to your network")]
    #[diagnostic(
        code(netwarden::not_connected),
        help("Run: netwarden device list to see what is currently attached.")
    )]
    NotConnected { identifier: String },

    #[error("Operation '{operation}' is not supported by the {backend} backend")]
    #[diagnostic(
        code(netwarden::unsupported),
        help(
            "The {backend} backend can only enumerate devices.\n\
             Blocking requires the netgear backend (--source netgear)."
        )
    )]
    Unsupported {
        operation: String,
        backend: &'static str,
    },

    #[error("The device source rejected the request: {message}")]
    #[diagnostic(code(netwarden::rejected))]
    Rejected { message: String },

    #[error("Could not decode the device source response: {message}")]
    #[diagnostic(
        code(netwarden::source_parse),
        help(
            "The router may be running an unsupported firmware version, or the \
             configured URL\npoints at something that is not the expected interface."
        )
    )]
    SourceParse { message: String },

    // ── Stores ───────────────────────────────────────────────────────
    #[error("Snapshot file {path} not found")]
    #[diagnostic(
        code(netwarden::snapshot_missing),
        help(
            "Create a baseline first: netwarden snapshot create\n\
             Then review it and remove devices you do not recognize."
        )
    )]
    SnapshotMissing { path: PathBuf },

    #[error("Malformed store file {path}: {message}")]
    #[diagnostic(
        code(netwarden::store_parse),
        help("Fix or delete the file; the snapshot can be re-captured with: netwarden snapshot create")
    )]
    StoreParse { path: PathBuf, message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netwarden::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(netwarden::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(netwarden::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(netwarden::serialize))]
    Toml(#[from] toml::ser::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::NoDevices { .. } => {
                exit_code::AUTH
            }
            Self::NotConnected { .. } | Self::SnapshotMissing { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { message } => CliError::ConnectionFailed { message },
            CoreError::Timeout { message } => CliError::Timeout { message },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::EmptyDeviceList { backend } => CliError::NoDevices { backend },
            CoreError::DeviceNotConnected { identifier } => CliError::NotConnected { identifier },
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::SourceParse { message } => CliError::SourceParse { message },
            CoreError::Unsupported { operation, backend } => {
                CliError::Unsupported { operation, backend }
            }
            CoreError::SnapshotMissing { path } => CliError::SnapshotMissing { path },
            CoreError::StoreParse { path, message } => CliError::StoreParse { path, message },
            CoreError::StoreIo { source, .. } => CliError::Io(source),
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
