// Deny-list store
//
// Append-oriented history of devices that were blocked, serialized as YAML
// so an operator can read and hand-edit it. Each record is keyed by
// `"{epoch}-{mac}"` -- the original epoch-only keying collides when two
// blocks land in the same second, so the identity is folded into the key.
// The MAC also lives in the record itself, which keeps old epoch-only keys
// readable and prunable.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Device, MacAddress};

/// Full device record captured at the moment of blocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyRecord {
    pub mac: MacAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    /// Epoch seconds at block time.
    pub blocked_at: i64,
}

/// The persisted deny-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenyList {
    path: PathBuf,
    entries: IndexMap<String, DenyRecord>,
    dirty: bool,
}

impl DenyList {
    /// Load the deny-list, failing on malformed content.
    ///
    /// Used by promotion, which rewrites the file: silently treating a
    /// corrupt file as empty there would destroy history on save.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.is_file() {
            return Ok(Self::empty(path));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::StoreIo {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::empty(path));
        }
        let entries = serde_yaml::from_str(&raw).map_err(|e| CoreError::StoreParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            entries,
            dirty: false,
        })
    }

    /// Load the deny-list, tolerating malformed content as empty.
    ///
    /// Used by the monitoring cycle, which only reads MACs for dedup and
    /// appends; a corrupt file should not stop intrusion handling.
    pub fn load_tolerant(path: &Path) -> Self {
        match Self::load(path) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(%err, "deny-list unreadable, treating as empty");
                Self::empty(path)
            }
        }
    }

    fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: IndexMap::new(),
            dirty: false,
        }
    }

    /// Whether any record references this identity.
    pub fn contains_mac(&self, mac: &MacAddress) -> bool {
        self.entries.values().any(|r| &r.mac == mac)
    }

    /// Append a record for a freshly blocked device.
    ///
    /// Callers are expected to check `contains_mac` first; this method
    /// does not dedup on its own.
    pub fn insert(&mut self, device: &Device, blocked_at: i64) {
        let key = format!("{blocked_at}-{}", device.mac);
        self.entries.insert(
            key,
            DenyRecord {
                mac: device.mac.clone(),
                ip: device.ip.clone(),
                name: device.name.clone(),
                kind: device.kind.clone(),
                signal: device.signal,
                blocked_at,
            },
        );
        self.dirty = true;
    }

    /// Remove every record for this identity, returning how many went.
    ///
    /// Exhaustive on purpose: historical runs that violated dedup may have
    /// left more than one record for the same MAC.
    pub fn remove_mac(&mut self, mac: &MacAddress) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, r| &r.mac != mac);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Overwrite the file with the current in-memory state.
    ///
    /// An empty list truncates the file rather than writing `{}`.
    pub fn save(&mut self) -> Result<(), CoreError> {
        let contents = if self.entries.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&self.entries).map_err(|e| CoreError::StoreParse {
                path: self.path.clone(),
                message: e.to_string(),
            })?
        };
        std::fs::write(&self.path, contents).map_err(|source| CoreError::StoreIo {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }

    /// Whether there are unpersisted changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DenyRecord)> {
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::DenyList;
    use crate::model::{Device, DeviceStatus, MacAddress};

    fn device(mac: &str, name: &str) -> Device {
        Device {
            mac: MacAddress::new(mac),
            ip: Some("192.168.1.99".into()),
            name: name.into(),
            kind: "wireless".into(),
            status: DeviceStatus::Allowed,
            signal: Some(55),
            last_activity: None,
        }
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocked.yaml");

        let mut list = DenyList::load(&path).unwrap();
        assert!(list.is_empty());
        list.insert(&device("AA:BB:CC:DD:EE:FF", "unknown-phone"), 1_700_000_000);
        list.save().unwrap();

        let loaded = DenyList::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_mac(&MacAddress::new("aa:bb:cc:dd:ee:ff")));
        let (key, record) = loaded.iter().next().unwrap();
        assert_eq!(key, "1700000000-AA:BB:CC:DD:EE:FF");
        assert_eq!(record.name, "unknown-phone");
    }

    #[test]
    fn same_second_blocks_get_distinct_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut list = DenyList::load(&dir.path().join("blocked.yaml")).unwrap();
        list.insert(&device("AA:AA:AA:AA:AA:AA", "one"), 1_700_000_000);
        list.insert(&device("BB:BB:BB:BB:BB:BB", "two"), 1_700_000_000);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn remove_mac_is_exhaustive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocked.yaml");
        let mut list = DenyList::load(&path).unwrap();
        // historical dedup violation: same MAC recorded twice
        list.insert(&device("AA:BB:CC:DD:EE:FF", "phone"), 100);
        list.insert(&device("AA:BB:CC:DD:EE:FF", "phone"), 200);
        list.insert(&device("11:22:33:44:55:66", "other"), 300);

        assert_eq!(list.remove_mac(&MacAddress::new("AA:BB:CC:DD:EE:FF")), 2);
        assert_eq!(list.len(), 1);

        // empty list truncates the file instead of writing "{}"
        assert_eq!(list.remove_mac(&MacAddress::new("11:22:33:44:55:66")), 1);
        list.save().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert!(DenyList::load(&path).unwrap().is_empty());
    }

    #[test]
    fn legacy_epoch_only_keys_stay_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocked.yaml");
        std::fs::write(
            &path,
            "'1650000000':\n  mac: 'AA:BB:CC:DD:EE:FF'\n  name: phone\n  kind: wireless\n  blocked_at: 1650000000\n",
        )
        .unwrap();

        let mut list = DenyList::load(&path).unwrap();
        assert!(list.contains_mac(&MacAddress::new("AA:BB:CC:DD:EE:FF")));
        assert_eq!(list.remove_mac(&MacAddress::new("AA:BB:CC:DD:EE:FF")), 1);
    }

    #[test]
    fn tolerant_load_swallows_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocked.yaml");
        std::fs::write(&path, ": not yaml [").unwrap();

        assert!(DenyList::load(&path).is_err());
        assert!(DenyList::load_tolerant(&path).is_empty());
    }
}
