// Snapshot store
//
// The baseline of known devices, keyed by IP address. On disk it is a JSON
// object mapping each address to the 3-element array `[name, kind, status]`;
// insertion order is preserved so the file diffs cleanly between captures.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Device, DeviceStatus};

/// Value stored per known address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SnapshotTuple", into = "SnapshotTuple")]
pub struct SnapshotEntry {
    pub name: String,
    pub kind: String,
    pub status: DeviceStatus,
}

type SnapshotTuple = (String, String, DeviceStatus);

impl From<SnapshotTuple> for SnapshotEntry {
    fn from((name, kind, status): SnapshotTuple) -> Self {
        Self { name, kind, status }
    }
}

impl From<SnapshotEntry> for SnapshotTuple {
    fn from(entry: SnapshotEntry) -> Self {
        (entry.name, entry.kind, entry.status)
    }
}

impl From<&Device> for SnapshotEntry {
    fn from(device: &Device) -> Self {
        Self {
            name: device.name.clone(),
            kind: device.kind.clone(),
            status: device.status,
        }
    }
}

/// The persisted mapping of known addresses to device metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStore {
    path: PathBuf,
    entries: IndexMap<String, SnapshotEntry>,
}

impl SnapshotStore {
    /// Load an existing snapshot.
    ///
    /// A missing file is a distinct, fatal error: the baseline is created
    /// only by an explicit operator action, never synthesized here.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.is_file() {
            return Err(CoreError::SnapshotMissing {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::StoreIo {
            path: path.to_path_buf(),
            source,
        })?;
        let entries = serde_json::from_str(&raw).map_err(|e| CoreError::StoreParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Build a fresh snapshot from the currently connected devices.
    ///
    /// Offline devices (no reported address) are skipped; the capture is a
    /// picture of the network as it stands right now.
    pub fn capture(path: &Path, devices: &[Device]) -> Self {
        let mut entries = IndexMap::new();
        for device in devices.iter().filter(|d| d.is_online()) {
            if let Some(ip) = device.ip.clone() {
                entries.insert(ip, SnapshotEntry::from(device));
            }
        }
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// In-memory store for tests and planning.
    pub fn from_entries(
        path: &Path,
        entries: impl IntoIterator<Item = (String, SnapshotEntry)>,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Overwrite the file with the current in-memory state.
    pub fn save(&self) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            CoreError::StoreParse {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        std::fs::write(&self.path, json).map_err(|source| CoreError::StoreIo {
            path: self.path.clone(),
            source,
        })
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.entries.contains_key(ip)
    }

    pub fn get(&self, ip: &str) -> Option<&SnapshotEntry> {
        self.entries.get(ip)
    }

    /// Mark a device as permanently allowed.
    ///
    /// If its address is already known the status is corrected in place;
    /// otherwise a new entry is appended. Returns `true` when the address
    /// already existed.
    pub fn promote(&mut self, device: &Device) -> bool {
        let Some(ip) = device.ip.clone() else {
            return false;
        };
        match self.entries.get_mut(&ip) {
            Some(entry) => {
                entry.status = DeviceStatus::Allowed;
                true
            }
            None => {
                let mut entry = SnapshotEntry::from(device);
                entry.status = DeviceStatus::Allowed;
                self.entries.insert(ip, entry);
                false
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SnapshotEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
