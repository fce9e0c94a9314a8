use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── MAC address ─────────────────────────────────────────────────────

/// Normalized MAC address -- the stable identity of a device.
///
/// Routers report MACs in mixed case and with either `:` or `-`
/// separators depending on firmware; everything is normalized to
/// uppercase colon form so identity comparison is a plain string match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase().replace('-', ":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ── Access status ───────────────────────────────────────────────────

/// Per-device access state as configured on the router.
///
/// Serialized with the vendor's own strings (`"Allow"` / `"Block"`) so the
/// snapshot file matches what the SOAP interface reports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum DeviceStatus {
    #[serde(rename = "Allow")]
    #[strum(serialize = "Allow")]
    Allowed,
    #[serde(rename = "Block")]
    #[strum(serialize = "Block")]
    Blocked,
}

// ── Device ──────────────────────────────────────────────────────────

/// One device as reported by a device source for the current cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Stable identity.
    pub mac: MacAddress,
    /// Current network address; `None` means the router no longer reports
    /// one and the device is treated as offline.
    pub ip: Option<String>,
    /// Display name; not guaranteed unique or stable.
    pub name: String,
    /// Connection or device type ("wireless", "Wi-Fi 5GHz", ...).
    pub kind: String,
    pub status: DeviceStatus,
    /// Signal strength in percent, where the backend reports it.
    pub signal: Option<i32>,
    /// Informational, included in alerts only.
    pub last_activity: Option<String>,
}

impl Device {
    /// Devices without an address are not considered part of the network.
    pub fn is_online(&self) -> bool {
        self.ip.as_deref().is_some_and(|ip| !ip.is_empty())
    }
}
