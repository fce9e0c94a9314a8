//! Outbound alert senders.
//!
//! Two delivery channels: a generic JSON webhook (chat ops, home-automation
//! bridges) and an SMS gateway POST. Both are fire-and-forget from the
//! caller's perspective; delivery failure is reported but the monitoring
//! cycle that produced the alert is unaffected.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// A rendered alert ready for delivery.
#[derive(Debug, Clone)]
pub struct AlertMessage {
    /// Short subject line, e.g. `Netwarden Alert - Thu Aug  6 21:14:05 2026`.
    pub subject: String,
    /// Human-readable body, one line per intruding device.
    pub text: String,
    /// Structured entries (`[{"Name": .., "MAC": .., "IP": ..}, ..]`).
    pub entries: serde_json::Value,
}

// ── Webhook ─────────────────────────────────────────────────────────

/// POSTs the alert as a JSON document to a configured URL.
pub struct WebhookSink {
    http: reqwest::Client,
    url: Url,
    bearer_token: Option<SecretString>,
}

impl WebhookSink {
    pub fn new(
        url: Url,
        bearer_token: Option<SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            url,
            bearer_token,
        })
    }

    /// Deliver the alert. Non-2xx responses are errors.
    pub async fn send(&self, message: &AlertMessage) -> Result<(), Error> {
        debug!(url = %self.url, "posting webhook alert");
        let body = json!({
            "subject": message.subject,
            "text": message.text,
            "alerts": message.entries,
        });

        let mut request = self.http.post(self.url.clone()).json(&body);
        if let Some(ref token) = self.bearer_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let resp = request.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

// ── SMS gateway ─────────────────────────────────────────────────────

/// POSTs the alert text to an SMS gateway endpoint.
pub struct SmsSink {
    http: reqwest::Client,
    url: Url,
    recipient: String,
    api_key: Option<SecretString>,
}

impl SmsSink {
    pub fn new(
        url: Url,
        recipient: String,
        api_key: Option<SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            url,
            recipient,
            api_key,
        })
    }

    /// Deliver the alert as a plain-text message.
    pub async fn send(&self, message: &AlertMessage) -> Result<(), Error> {
        debug!(url = %self.url, to = %self.recipient, "posting SMS alert");
        let body = json!({
            "to": self.recipient,
            "subject": message.subject,
            "message": message.text,
        });

        let mut request = self.http.post(self.url.clone()).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let resp = request.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
