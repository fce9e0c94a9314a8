//! Alert delivery orchestration.
//!
//! Delivery is best-effort: a cycle that found intruders is still a
//! successful cycle when every sink errors out. A marker file records the
//! last successful delivery so an intruder that lingers across many cycles
//! does not page the operator every few minutes.

use std::path::PathBuf;

use netwarden_api::alert::{AlertMessage, SmsSink, WebhookSink};
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::model::ThreatReport;

const SUPPRESSION_WINDOW_SECS: i64 = 3_600;

// ── Rate-limit gate ─────────────────────────────────────────────────

/// Hour-based suppression backed by a single timestamp marker file.
#[derive(Debug, Clone)]
pub struct AlertGate {
    marker: PathBuf,
    window_secs: i64,
}

impl AlertGate {
    pub fn new(marker: PathBuf) -> Self {
        Self {
            marker,
            window_secs: SUPPRESSION_WINDOW_SECS,
        }
    }

    #[cfg(test)]
    fn with_window(marker: PathBuf, window_secs: i64) -> Self {
        Self { marker, window_secs }
    }

    /// Whether enough time has passed since the last successful delivery.
    ///
    /// A missing or unreadable marker means "send": losing the marker only
    /// risks one extra alert.
    pub fn should_send(&self, now: i64) -> bool {
        let Ok(raw) = std::fs::read_to_string(&self.marker) else {
            return true;
        };
        // older versions wrote fractional epoch seconds
        let Ok(last) = raw.trim().parse::<f64>() else {
            return true;
        };
        #[allow(clippy::cast_precision_loss)]
        let elapsed = now as f64 - last;
        elapsed >= self.window_secs as f64
    }

    /// Record a successful delivery.
    pub fn record(&self, now: i64) -> Result<(), CoreError> {
        std::fs::write(&self.marker, now.to_string()).map_err(|source| CoreError::StoreIo {
            path: self.marker.clone(),
            source,
        })
    }
}

// ── Message rendering ───────────────────────────────────────────────

/// Render the threat report into a deliverable alert.
pub fn render_message(report: &ThreatReport, timestamp: &str) -> AlertMessage {
    let text = report
        .entries
        .iter()
        .map(|e| format!("Name: {}\nMAC: {}\nIP: {}\n", e.name, e.mac, e.ip))
        .collect::<Vec<_>>()
        .join("\n");
    AlertMessage {
        subject: format!("Netwarden Alert - {timestamp}"),
        text,
        entries: json!(report.entries),
    }
}

// ── Notifier ────────────────────────────────────────────────────────

/// Fans an alert out to every configured sink.
pub struct Notifier {
    webhook: Option<WebhookSink>,
    sms: Option<SmsSink>,
    gate: AlertGate,
}

impl Notifier {
    pub fn new(webhook: Option<WebhookSink>, sms: Option<SmsSink>, gate: AlertGate) -> Self {
        Self { webhook, sms, gate }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook.is_some() || self.sms.is_some()
    }

    /// Deliver the report. Never fails the caller; every outcome is logged.
    ///
    /// The marker is updated only after at least one sink accepted the
    /// alert, so a total delivery failure is retried on the next cycle.
    pub async fn notify(&self, report: &ThreatReport) {
        if report.is_empty() {
            return;
        }
        if !self.is_configured() {
            info!("no alert sinks configured, skipping notification");
            return;
        }

        let now = chrono::Utc::now().timestamp();
        if !self.gate.should_send(now) {
            info!("an alert was already sent within the last hour");
            return;
        }

        let timestamp = chrono::Local::now().format("%c").to_string();
        let message = render_message(report, &timestamp);

        let mut delivered = false;
        if let Some(ref webhook) = self.webhook {
            match webhook.send(&message).await {
                Ok(()) => {
                    info!(devices = report.len(), "webhook alert delivered");
                    delivered = true;
                }
                Err(err) => error!(%err, "failed to deliver webhook alert"),
            }
        }
        if let Some(ref sms) = self.sms {
            match sms.send(&message).await {
                Ok(()) => {
                    info!(devices = report.len(), "SMS alert delivered");
                    delivered = true;
                }
                Err(err) => error!(%err, "failed to deliver SMS alert"),
            }
        }

        if delivered {
            if let Err(err) = self.gate.record(now) {
                warn!(%err, "could not update the alert marker file");
            }
        }
    }
}
