use serde::{Deserialize, Serialize};

use super::device::Device;

/// One newly-seen device in a cycle's threat report.
///
/// Field names match the alert payload contract (`Name` / `MAC` / `IP`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MAC")]
    pub mac: String,
    #[serde(rename = "IP")]
    pub ip: String,
}

impl From<&Device> for ThreatEntry {
    fn from(device: &Device) -> Self {
        Self {
            name: device.name.clone(),
            mac: device.mac.to_string(),
            ip: device.ip.clone().unwrap_or_default(),
        }
    }
}

/// The accumulated list of unknown-but-allowed devices found in one cycle.
///
/// Deliberately NOT deduplicated against deny-list history: a device that
/// is already on the deny-list but shows up again is still an active
/// threat worth reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatReport {
    pub entries: Vec<ThreatEntry>,
}

impl ThreatReport {
    pub fn push(&mut self, device: &Device) {
        self.entries.push(ThreatEntry::from(device));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
