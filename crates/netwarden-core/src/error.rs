// ── Core error types ──
//
// User-facing errors from netwarden-core. These are NOT API-specific --
// consumers never see raw HTTP or XML failures directly. The
// `From<netwarden_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the device source: {message}")]
    ConnectionFailed { message: String },

    #[error("Device source timed out: {message}")]
    Timeout { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Device source errors ─────────────────────────────────────────
    /// The router returned no devices at all. On the vendor backend this
    /// almost always means the admin password is wrong or missing.
    #[error("The {backend} backend returned no devices")]
    EmptyDeviceList { backend: &'static str },

    #[error("Device '{identifier}' is not connected to your network")]
    DeviceNotConnected { identifier: String },

    #[error("The device source rejected the request: {message}")]
    Rejected { message: String },

    #[error("Could not decode the device source response: {message}")]
    SourceParse { message: String },

    #[error("Operation '{operation}' is not supported by the {backend} backend")]
    Unsupported {
        operation: String,
        backend: &'static str,
    },

    // ── Store errors ─────────────────────────────────────────────────
    /// The snapshot baseline does not exist yet. It is never created
    /// implicitly; the operator must run the snapshot capture first.
    #[error("Snapshot file {path} not found -- run 'snapshot create' and review it first")]
    SnapshotMissing { path: PathBuf },

    #[error("Malformed store file {path}: {message}")]
    StoreParse { path: PathBuf, message: String },

    #[error("Failed to access {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netwarden_api::Error> for CoreError {
    fn from(err: netwarden_api::Error) -> Self {
        match err {
            netwarden_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            netwarden_api::Error::PasswordRequired { backend } => CoreError::Config {
                message: format!("a router password is required for the {backend} backend"),
            },
            netwarden_api::Error::Transport(e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        message: e.to_string(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        message: e.to_string(),
                    }
                }
            }
            netwarden_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid device source URL: {e}"),
            },
            netwarden_api::Error::UnexpectedStatus { status, .. } => CoreError::Rejected {
                message: format!("unexpected HTTP status {status}"),
            },
            netwarden_api::Error::CommandRejected { action, code } => CoreError::Rejected {
                message: format!("{action} failed with vendor code {code}"),
            },
            netwarden_api::Error::Parse { message } => CoreError::SourceParse { message },
        }
    }
}
