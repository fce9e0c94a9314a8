//! Configuration loading and collaborator construction.
//!
//! TOML file + `NETWARDEN_`-prefixed environment variables (double
//! underscore for nesting, e.g. `NETWARDEN_NETGEAR__PASSWORD`). The config
//! is loaded once at startup and passed by reference; there is no global
//! mutable state.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use netwarden_api::TransportConfig;
use netwarden_api::alert::{SmsSink, WebhookSink};
use netwarden_api::gateway::GatewayClient;
use netwarden_api::netgear::NetgearClient;
use netwarden_core::{AlertGate, AnySource, GatewaySource, NetgearSource, Notifier, StorePaths};

use crate::cli::{GlobalOpts, SourceArg};
use crate::error::CliError;

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Which backend to scan.
    #[serde(default)]
    pub source: SourceKind,

    /// Directory for the snapshot, deny-list, and alert marker files.
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub netgear: NetgearConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub alerts: AlertsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceKind::Netgear,
            data_dir: None,
            netgear: NetgearConfig::default(),
            gateway: GatewayConfig::default(),
            alerts: AlertsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Netgear,
    Gateway,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetgearConfig {
    /// SOAP service root.
    #[serde(default = "default_netgear_url")]
    pub url: String,

    /// Admin user name.
    #[serde(default = "default_username")]
    pub username: String,

    /// Admin password (plaintext -- prefer NETWARDEN_NETGEAR__PASSWORD).
    pub password: Option<String>,
}

impl Default for NetgearConfig {
    fn default() -> Self {
        Self {
            url: default_netgear_url(),
            username: default_username(),
            password: None,
        }
    }
}

fn default_netgear_url() -> String {
    "http://192.168.1.1:5000".into()
}
fn default_username() -> String {
    "admin".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Gateway root serving the status pages.
    #[serde(default = "default_gateway_url")]
    pub url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
        }
    }
}

fn default_gateway_url() -> String {
    "http://192.168.1.254".into()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlertsConfig {
    /// JSON webhook endpoint.
    pub webhook_url: Option<String>,

    /// Bearer token for the webhook endpoint.
    pub webhook_token: Option<String>,

    /// SMS gateway endpoint.
    pub sms_url: Option<String>,

    /// Destination phone number.
    pub sms_recipient: Option<String>,

    /// API key for the SMS gateway.
    pub sms_api_key: Option<String>,
}

// ── Paths ────────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "netwarden", "netwarden").map_or_else(
        || PathBuf::from(".netwarden/config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("io", "netwarden", "netwarden").map_or_else(
        || PathBuf::from(".netwarden"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

// ── Loading ──────────────────────────────────────────────────────────

/// Load the full config from defaults + file + environment.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = global.config.clone().unwrap_or_else(config_path);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("NETWARDEN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Resolve the active backend kind: CLI flag wins over the config file.
pub fn active_source(config: &Config, global: &GlobalOpts) -> SourceKind {
    match global.source {
        Some(SourceArg::Netgear) => SourceKind::Netgear,
        Some(SourceArg::Gateway) => SourceKind::Gateway,
        None => config.source,
    }
}

/// Resolve and create the data directory, returning the store locations.
pub fn store_paths(config: &Config, global: &GlobalOpts) -> Result<StorePaths, CliError> {
    let dir = global
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(default_data_dir);
    std::fs::create_dir_all(&dir)?;
    Ok(StorePaths::in_dir(&dir))
}

// ── Collaborator construction ────────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build the configured device source.
pub fn build_source(config: &Config, global: &GlobalOpts) -> Result<AnySource, CliError> {
    let transport = TransportConfig::with_timeout(std::time::Duration::from_secs(global.timeout));

    match active_source(config, global) {
        SourceKind::Netgear => {
            let url = parse_url("netgear.url", &config.netgear.url)?;
            let password = config
                .netgear
                .password
                .clone()
                .map(SecretString::from)
                .ok_or(CliError::NoCredentials { backend: "netgear" })?;
            let client = NetgearClient::new(
                &url,
                config.netgear.username.clone(),
                password,
                &transport,
            )
            .map_err(netwarden_core::CoreError::from)?;
            Ok(AnySource::Netgear(NetgearSource::new(client)))
        }
        SourceKind::Gateway => {
            let url = parse_url("gateway.url", &config.gateway.url)?;
            let client =
                GatewayClient::new(&url, &transport).map_err(netwarden_core::CoreError::from)?;
            Ok(AnySource::Gateway(GatewaySource::new(client)))
        }
    }
}

/// Build the alert notifier from whatever sinks are configured.
pub fn build_notifier(
    config: &Config,
    global: &GlobalOpts,
    paths: &StorePaths,
) -> Result<Notifier, CliError> {
    let transport = TransportConfig::with_timeout(std::time::Duration::from_secs(global.timeout));
    let alerts = &config.alerts;

    let webhook = match alerts.webhook_url.as_deref() {
        Some(raw) => {
            let url = parse_url("alerts.webhook_url", raw)?;
            let token = alerts.webhook_token.clone().map(SecretString::from);
            Some(
                WebhookSink::new(url, token, &transport)
                    .map_err(netwarden_core::CoreError::from)?,
            )
        }
        None => None,
    };

    let sms = match (alerts.sms_url.as_deref(), alerts.sms_recipient.clone()) {
        (Some(raw), Some(recipient)) => {
            let url = parse_url("alerts.sms_url", raw)?;
            let key = alerts.sms_api_key.clone().map(SecretString::from);
            Some(
                SmsSink::new(url, recipient, key, &transport)
                    .map_err(netwarden_core::CoreError::from)?,
            )
        }
        (None, None) => None,
        _ => {
            return Err(CliError::Validation {
                field: "alerts".into(),
                reason: "sms_url and sms_recipient must be set together".into(),
            });
        }
    };

    Ok(Notifier::new(
        webhook,
        sms,
        AlertGate::new(paths.alert_marker.clone()),
    ))
}

// ── Starter config ───────────────────────────────────────────────────

/// Commented template written by `config init`.
pub fn starter_toml() -> String {
    r#"# netwarden configuration
#
# Environment variables override this file with a NETWARDEN_ prefix and
# double underscores for nesting, e.g. NETWARDEN_NETGEAR__PASSWORD.

# Which backend to scan: "netgear" (can block) or "gateway" (report-only).
source = "netgear"

# Where the snapshot, deny-list, and alert marker live.
# Defaults to the platform data directory.
#data_dir = "/var/lib/netwarden"

[netgear]
url = "http://192.168.1.1:5000"
username = "admin"
# Prefer NETWARDEN_NETGEAR__PASSWORD over storing the password here.
#password = ""

[gateway]
url = "http://192.168.1.254"

[alerts]
# Deliveries are rate-limited to one per hour.
#webhook_url = "https://example.com/hooks/netwarden"
#webhook_token = ""
#sms_url = "https://sms.example.com/v1/send"
#sms_recipient = "+15551234567"
#sms_api_key = ""
"#
    .to_owned()
}

/// Copy of the config with secrets masked, for `config show`.
pub fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    shown.netgear.password = shown.netgear.password.map(|_| "***".into());
    shown.alerts.webhook_token = shown.alerts.webhook_token.map(|_| "***".into());
    shown.alerts.sms_api_key = shown.alerts.sms_api_key.map(|_| "***".into());
    shown
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{Config, SourceKind};

    #[test]
    fn starter_config_parses_back() {
        let config: Config = toml::from_str(&super::starter_toml()).unwrap();
        assert_eq!(config.source, SourceKind::Netgear);
        assert_eq!(config.netgear.username, "admin");
        assert!(config.alerts.webhook_url.is_none());
    }

    #[test]
    fn redaction_masks_secrets() {
        let mut config = Config::default();
        config.netgear.password = Some("hunter2".into());
        let shown = super::redacted(&config);
        assert_eq!(shown.netgear.password.as_deref(), Some("***"));
    }
}
