use thiserror::Error;

/// Top-level error type for the `netwarden-api` crate.
///
/// Covers every failure mode across the router backends and the alert
/// senders. `netwarden-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Router login failed (wrong password, locked admin session, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// No admin password was supplied but the backend requires one.
    #[error("Router password required for the {backend} backend")]
    PasswordRequired { backend: &'static str },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status from the router or alert endpoint.
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    // ── Vendor commands ─────────────────────────────────────────────
    /// The router accepted the request but rejected the command.
    #[error("Router rejected {action} (code {code})")]
    CommandRejected { action: &'static str, code: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response payload could not be parsed (SOAP envelope, device
    /// record string, or status-page table).
    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying
    /// on the next scheduled cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::UnexpectedStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
