// Netgear SOAP client
//
// Wraps `reqwest::Client` with SOAP envelope construction, response-code
// checking, and the record-string decoding done in `models.rs`. The router
// speaks SOAP 1.1 on `/soap/server_sa/` and identifies sessions with a
// fixed well-known ID rather than cookies.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::netgear::models::{AllowOrBlock, AttachedDevice, parse_attach_device};
use crate::transport::TransportConfig;

const SESSION_ID: &str = "A7D88AE69687E58D9A00";

const SERVICE_PARENTAL: &str = "urn:NETGEAR-ROUTER:service:ParentalControl:1";
const SERVICE_DEVICE_INFO: &str = "urn:NETGEAR-ROUTER:service:DeviceInfo:1";
const SERVICE_DEVICE_CONFIG: &str = "urn:NETGEAR-ROUTER:service:DeviceConfig:1";

/// Raw SOAP client for a Netgear router's management service.
///
/// Callers must `login()` once before issuing other calls; the router
/// associates the authenticated state with the session ID carried in
/// every envelope header.
pub struct NetgearClient {
    http: reqwest::Client,
    endpoint: Url,
    username: String,
    password: SecretString,
}

impl NetgearClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the SOAP service root, e.g. `http://192.168.1.1:5000`.
    pub fn new(
        base_url: &Url,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint: base_url.join("soap/server_sa/")?,
            username,
            password,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (used in tests).
    pub fn with_client(
        http: reqwest::Client,
        base_url: &Url,
        username: String,
        password: SecretString,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            endpoint: base_url.join("soap/server_sa/")?,
            username,
            password,
        })
    }

    /// Authenticate the session.
    ///
    /// `{SERVICE_PARENTAL}#Authenticate` with the admin credentials.
    pub async fn login(&self) -> Result<(), Error> {
        debug!("authenticating against router SOAP service");
        let body = format!(
            "<M1:Authenticate xmlns:M1=\"{SERVICE_PARENTAL}\">\
             <NewUsername>{}</NewUsername>\
             <NewPassword>{}</NewPassword>\
             </M1:Authenticate>",
            escape(&self.username),
            escape(self.password.expose_secret()),
        );
        self.soap_call("Authenticate", SERVICE_PARENTAL, &body)
            .await?;
        Ok(())
    }

    /// List all devices currently attached to the router.
    ///
    /// `{SERVICE_DEVICE_INFO}#GetAttachDevice`; the device list arrives as a
    /// delimited record string inside `<NewAttachDevice>`.
    pub async fn get_attached_devices(&self) -> Result<Vec<AttachedDevice>, Error> {
        debug!("listing attached devices");
        let body = format!(
            "<M1:GetAttachDevice xmlns:M1=\"{SERVICE_DEVICE_INFO}\"></M1:GetAttachDevice>"
        );
        let response = self
            .soap_call("GetAttachDevice", SERVICE_DEVICE_INFO, &body)
            .await?;

        let raw = tag_text(&response, "NewAttachDevice").ok_or_else(|| {
            Error::parse("response is missing the NewAttachDevice element")
        })?;
        Ok(parse_attach_device(&raw))
    }

    /// Allow or block internet access for a device by MAC address.
    ///
    /// `{SERVICE_DEVICE_CONFIG}#SetBlockDeviceByMAC`, bracketed by the
    /// configuration start/finish handshake the firmware requires for any
    /// mutating call.
    pub async fn set_device_status(
        &self,
        mac: &str,
        status: AllowOrBlock,
    ) -> Result<(), Error> {
        debug!(mac, %status, "setting device access");
        self.configuration_started().await?;

        let body = format!(
            "<M1:SetBlockDeviceByMAC xmlns:M1=\"{SERVICE_DEVICE_CONFIG}\">\
             <NewAllowOrBlock>{}</NewAllowOrBlock>\
             <NewMACAddress>{}</NewMACAddress>\
             </M1:SetBlockDeviceByMAC>",
            status.as_str(),
            escape(mac),
        );
        let result = self
            .soap_call("SetBlockDeviceByMAC", SERVICE_DEVICE_CONFIG, &body)
            .await;

        // Always attempt to close the configuration window, but report the
        // command's own failure first.
        let finished = self.configuration_finished().await;
        result?;
        finished
    }

    async fn configuration_started(&self) -> Result<(), Error> {
        let body = format!(
            "<M1:ConfigurationStarted xmlns:M1=\"{SERVICE_DEVICE_CONFIG}\">\
             <NewSessionID>{SESSION_ID}</NewSessionID>\
             </M1:ConfigurationStarted>"
        );
        self.soap_call("ConfigurationStarted", SERVICE_DEVICE_CONFIG, &body)
            .await?;
        Ok(())
    }

    async fn configuration_finished(&self) -> Result<(), Error> {
        let body = format!(
            "<M1:ConfigurationFinished xmlns:M1=\"{SERVICE_DEVICE_CONFIG}\">\
             <NewStatus>ChangesApplied</NewStatus>\
             </M1:ConfigurationFinished>"
        );
        self.soap_call("ConfigurationFinished", SERVICE_DEVICE_CONFIG, &body)
            .await?;
        Ok(())
    }

    // ── Request plumbing ─────────────────────────────────────────────

    /// POST a SOAP envelope and verify the embedded `<ResponseCode>`.
    ///
    /// `000` is success; `401` means the session is not authenticated;
    /// anything else is a vendor-side rejection of the action.
    async fn soap_call(
        &self,
        action: &'static str,
        service: &str,
        body: &str,
    ) -> Result<String, Error> {
        let envelope = format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\
             <SOAP-ENV:Envelope xmlns:SOAP-ENV=\"http://schemas.xmlsoap.org/soap/envelope/\">\
             <SOAP-ENV:Header><SessionID>{SESSION_ID}</SessionID></SOAP-ENV:Header>\
             <SOAP-ENV:Body>{body}</SOAP-ENV:Body>\
             </SOAP-ENV:Envelope>"
        );

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header("SOAPAction", format!("{service}#{action}"))
            .header(reqwest::header::CONTENT_TYPE, "text/xml;charset=utf-8")
            .body(envelope)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        match tag_text(&text, "ResponseCode").as_deref() {
            Some("000" | "0") => Ok(text),
            Some("401") => Err(Error::Authentication {
                message: "router rejected the admin credentials".into(),
            }),
            Some(code) => Err(Error::CommandRejected {
                action,
                code: code.to_owned(),
            }),
            None => Err(Error::parse("response is missing the ResponseCode element")),
        }
    }
}

/// Extract the text content of the first element with the given local name.
///
/// Namespace-agnostic on purpose: firmware versions disagree about prefixes.
fn tag_text(xml: &str, tag: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == tag.as_bytes() => {
                inside = true;
            }
            Ok(Event::Text(e)) if inside => {
                return e.unescape().ok().map(|text| text.trim().to_owned());
            }
            Ok(Event::End(ref e)) if inside && e.local_name().as_ref() == tag.as_bytes() => {
                return Some(String::new());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}
