// Gateway status-page HTTP client
//
// One unauthenticated GET per listing; all the real work happens in
// `parse.rs`.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::gateway::parse::{GatewayDevice, parse_devices};
use crate::transport::TransportConfig;

/// Client for a residential gateway's device status page.
pub struct GatewayClient {
    http: reqwest::Client,
    devices_url: Url,
}

impl GatewayClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the gateway root, e.g. `http://192.168.1.254`.
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            devices_url: base_url.join("cgi-bin/devices.ha")?,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (used in tests).
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Result<Self, Error> {
        Ok(Self {
            http,
            devices_url: base_url.join("cgi-bin/devices.ha")?,
        })
    }

    /// Fetch and decode the device table.
    ///
    /// `GET /cgi-bin/devices.ha`
    pub async fn get_attached_devices(&self) -> Result<Vec<GatewayDevice>, Error> {
        debug!(url = %self.devices_url, "fetching gateway device table");

        let resp = self
            .http
            .get(self.devices_url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let devices = parse_devices(&body);
        if devices.is_empty() && !body.to_lowercase().contains("<table") {
            return Err(Error::parse("status page contains no device table"));
        }
        Ok(devices)
    }
}
