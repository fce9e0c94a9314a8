//! The snapshot-diff reconciliation engine.
//!
//! One `Warden` owns a device source and the paths of the two stores. A
//! monitoring cycle compares the live device list against the snapshot
//! baseline and reacts to newcomers; `always_allow` promotes a device to
//! the permanent allow list and corrects both stores.
//!
//! The diff itself is a pure function (`plan_cycle`) so the policy can be
//! tested without any I/O; `Warden` executes the plan's side effects.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::CoreError;
use crate::model::{Device, DeviceStatus, MacAddress, ThreatReport};
use crate::source::DeviceSource;
use crate::store::{DenyList, SnapshotStore};

// ── Store locations ─────────────────────────────────────────────────

/// Filesystem locations of the persisted stores.
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub snapshot: PathBuf,
    pub deny_list: PathBuf,
    pub alert_marker: PathBuf,
}

impl StorePaths {
    /// Conventional layout inside a data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            snapshot: dir.join("snapshot.json"),
            deny_list: dir.join("blocked.yaml"),
            alert_marker: dir.join("last_notify"),
        }
    }
}

// ── Pure planning ───────────────────────────────────────────────────

/// What one cycle decided, before any side effect happens.
#[derive(Debug, Default)]
pub struct CyclePlan {
    /// Unknown devices the router still allows: candidates for blocking,
    /// deny-list recording, and the threat report.
    pub unknown_allowed: Vec<Device>,
    /// Unknown devices the router already blocks: logged, nothing else.
    pub unknown_blocked: Vec<Device>,
    /// Alert payload covering every unknown-but-allowed device.
    pub report: ThreatReport,
}

/// Diff the live device list against the snapshot baseline.
///
/// Devices whose address is in the snapshot are known and skipped; devices
/// without an address are offline and skipped. The report is NOT
/// deduplicated against deny-list history -- a recurring intruder is still
/// an active threat.
pub fn plan_cycle(current: &[Device], snapshot: &SnapshotStore) -> CyclePlan {
    let mut plan = CyclePlan::default();

    for device in current {
        let Some(ip) = device.ip.as_deref().filter(|ip| !ip.is_empty()) else {
            debug!(mac = %device.mac, name = %device.name, "skipping offline device");
            continue;
        };
        if snapshot.contains(ip) {
            debug!(ip, name = %device.name, "known device");
            continue;
        }

        warn!(
            name = %device.name,
            mac = %device.mac,
            ip,
            signal = device.signal,
            "unknown device has connected to your network"
        );
        match device.status {
            DeviceStatus::Allowed => {
                plan.report.push(device);
                plan.unknown_allowed.push(device.clone());
            }
            DeviceStatus::Blocked => {
                info!(name = %device.name, "device does not have internet access");
                plan.unknown_blocked.push(device.clone());
            }
        }
    }
    plan
}

// ── Cycle summary ───────────────────────────────────────────────────

/// Outcome of one monitoring cycle.
#[derive(Debug)]
pub struct CycleSummary {
    /// Devices the source reported.
    pub scanned: usize,
    /// Unknown-but-allowed devices found this cycle.
    pub report: ThreatReport,
    /// Deny-list records appended this cycle.
    pub newly_denied: usize,
    /// Intruders that already had a deny-list record.
    pub already_denied: usize,
}

// ── Orchestrator ────────────────────────────────────────────────────

/// Owns a device source and the store locations; runs the operations.
pub struct Warden<S> {
    source: S,
    paths: StorePaths,
}

impl<S: DeviceSource> Warden<S> {
    pub fn new(source: S, paths: StorePaths) -> Self {
        Self { source, paths }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Capture the current device list as the new snapshot baseline,
    /// unconditionally overwriting any previous file. Returns the number
    /// of devices captured.
    pub async fn create_snapshot(&self) -> Result<usize, CoreError> {
        warn!("A snapshot captures the devices connected to your network at this moment.");
        warn!(
            path = %self.paths.snapshot.display(),
            "It becomes the baseline for alerting and blocking -- review it manually and \
             remove any device you do not recognize."
        );
        let devices = self.fetch_devices().await?;
        let store = SnapshotStore::capture(&self.paths.snapshot, &devices);
        store.save()?;
        info!(devices = store.len(), "snapshot created");
        Ok(store.len())
    }

    /// Run one monitoring cycle.
    ///
    /// The snapshot is read-only here; only the deny-list may be written,
    /// and only when `block_enabled` is set. A failed vendor block command
    /// is logged and the cycle continues -- the external scheduler owns
    /// retries.
    pub async fn run(&self, block_enabled: bool) -> Result<CycleSummary, CoreError> {
        let snapshot = SnapshotStore::load(&self.paths.snapshot)?;
        let mut deny_list = DenyList::load_tolerant(&self.paths.deny_list);

        let devices = self.fetch_devices().await?;
        let plan = plan_cycle(&devices, &snapshot);

        let mut newly_denied = 0;
        let mut already_denied = 0;
        if block_enabled {
            for device in &plan.unknown_allowed {
                info!(name = %device.name, mac = %device.mac, "blocking internet access");
                if let Err(err) = self.source.set_status(&device.mac, DeviceStatus::Blocked).await
                {
                    // the device stays allowed until the next cycle retries
                    error!(name = %device.name, %err, "block command failed");
                }
                if deny_list.contains_mac(&device.mac) {
                    info!(name = %device.name, "device is already on the deny list");
                    already_denied += 1;
                } else {
                    deny_list.insert(device, chrono::Utc::now().timestamp());
                    info!(
                        name = %device.name,
                        path = %self.paths.deny_list.display(),
                        "deny-list record stored"
                    );
                    newly_denied += 1;
                }
            }
        }

        if deny_list.is_dirty() {
            deny_list.save()?;
        }

        if plan.report.is_empty() {
            info!("scan complete, no threats found on your network");
        }

        Ok(CycleSummary {
            scanned: devices.len(),
            report: plan.report,
            newly_denied,
            already_denied,
        })
    }

    /// Permanently whitelist a device, correcting both stores.
    ///
    /// The device must be currently visible to the source. Store updates
    /// are per-store atomic only: a crash between the snapshot write and
    /// the deny-list write can leave a stale deny-list record, which the
    /// next promotion of the same device cleans up.
    pub async fn always_allow(&self, identifier: &str) -> Result<Device, CoreError> {
        let device = self.resolve(identifier).await?;
        info!(name = %device.name, "granting internet access");
        self.source
            .set_status(&device.mac, DeviceStatus::Allowed)
            .await?;

        if device.is_online() {
            let mut snapshot = SnapshotStore::load(&self.paths.snapshot)?;
            if snapshot.promote(&device) {
                info!(name = %device.name, "snapshot entry set to Allow");
            } else {
                info!(name = %device.name, path = %self.paths.snapshot.display(), "added to snapshot");
            }
            snapshot.save()?;
        } else {
            warn!(name = %device.name, "device reports no address, snapshot left unchanged");
        }

        let mut deny_list = DenyList::load(&self.paths.deny_list)?;
        let removed = deny_list.remove_mac(&device.mac);
        if removed > 0 {
            info!(
                name = %device.name,
                records = removed,
                path = %self.paths.deny_list.display(),
                "removed from deny list"
            );
            deny_list.save()?;
        }

        Ok(device)
    }

    /// One-shot allow/block without touching the stores.
    pub async fn set_access(
        &self,
        identifier: &str,
        status: DeviceStatus,
    ) -> Result<Device, CoreError> {
        let device = self.resolve(identifier).await?;
        match status {
            DeviceStatus::Allowed => info!(name = %device.name, "granting internet access"),
            DeviceStatus::Blocked => info!(name = %device.name, "blocking internet access"),
        }
        self.source.set_status(&device.mac, status).await?;
        Ok(device)
    }

    /// Normalize a name-or-MAC identifier to a live device.
    ///
    /// This is the single resolution step in front of every operation that
    /// takes user input; a device that is not currently visible is a
    /// distinct error, not a silent no-op.
    pub async fn resolve(&self, identifier: &str) -> Result<Device, CoreError> {
        debug!(identifier, "resolving device");
        let wanted_mac = MacAddress::new(identifier);
        let devices = self.fetch_devices().await?;
        devices
            .into_iter()
            .find(|d| d.name == identifier || d.mac == wanted_mac)
            .ok_or_else(|| CoreError::DeviceNotConnected {
                identifier: identifier.to_owned(),
            })
    }

    /// List devices, treating an empty result as fatal: a router that
    /// answers with nothing has almost certainly rejected the credentials.
    async fn fetch_devices(&self) -> Result<Vec<Device>, CoreError> {
        info!(backend = self.source.name(), "listing devices connected to your network");
        let devices = self.source.list_devices().await?;
        if devices.is_empty() {
            return Err(CoreError::EmptyDeviceList {
                backend: self.source.name(),
            });
        }
        Ok(devices)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::{StorePaths, Warden, plan_cycle};
    use crate::error::CoreError;
    use crate::model::{Device, DeviceStatus, MacAddress, ThreatEntry};
    use crate::source::DeviceSource;
    use crate::store::{DenyList, SnapshotEntry, SnapshotStore};

    fn device(mac: &str, ip: &str, name: &str, status: DeviceStatus) -> Device {
        Device {
            mac: MacAddress::new(mac),
            ip: Some(ip.into()).filter(|s: &String| !s.is_empty()),
            name: name.into(),
            kind: "wireless".into(),
            status,
            signal: Some(60),
            last_activity: None,
        }
    }

    fn snapshot_with_laptop(path: &Path) -> SnapshotStore {
        SnapshotStore::from_entries(
            path,
            [(
                "192.168.1.10".to_owned(),
                SnapshotEntry {
                    name: "laptop".into(),
                    kind: "PC".into(),
                    status: DeviceStatus::Allowed,
                },
            )],
        )
    }

    // ── Fake source ─────────────────────────────────────────────────

    #[derive(Default)]
    struct FakeSource {
        devices: Vec<Device>,
        status_calls: Mutex<Vec<(MacAddress, DeviceStatus)>>,
        fail_set_status: bool,
    }

    impl FakeSource {
        fn with_devices(devices: Vec<Device>) -> Self {
            Self {
                devices,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(MacAddress, DeviceStatus)> {
            self.status_calls.lock().unwrap().clone()
        }
    }

    impl DeviceSource for FakeSource {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn supports_enforcement(&self) -> bool {
            true
        }

        async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
            Ok(self.devices.clone())
        }

        async fn set_status(
            &self,
            mac: &MacAddress,
            status: DeviceStatus,
        ) -> Result<(), CoreError> {
            self.status_calls.lock().unwrap().push((mac.clone(), status));
            if self.fail_set_status {
                return Err(CoreError::Rejected {
                    message: "vendor said no".into(),
                });
            }
            Ok(())
        }
    }

    fn warden_in(dir: &Path, source: FakeSource) -> Warden<FakeSource> {
        Warden::new(source, StorePaths::in_dir(dir))
    }

    // ── plan_cycle (pure) ───────────────────────────────────────────

    #[test]
    fn known_devices_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with_laptop(&dir.path().join("snapshot.json"));
        let current = vec![device(
            "AA:AA:AA:AA:AA:AA",
            "192.168.1.10",
            "laptop",
            DeviceStatus::Allowed,
        )];

        let plan = plan_cycle(&current, &snapshot);
        assert!(plan.report.is_empty());
        assert!(plan.unknown_allowed.is_empty());
        assert!(plan.unknown_blocked.is_empty());
    }

    #[test]
    fn offline_devices_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with_laptop(&dir.path().join("snapshot.json"));
        let current = vec![device("AA:BB:CC:DD:EE:FF", "", "ghost", DeviceStatus::Allowed)];

        let plan = plan_cycle(&current, &snapshot);
        assert!(plan.report.is_empty());
    }

    #[test]
    fn unknown_blocked_devices_are_logged_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_with_laptop(&dir.path().join("snapshot.json"));
        let current = vec![device(
            "AA:BB:CC:DD:EE:FF",
            "192.168.1.50",
            "already-blocked",
            DeviceStatus::Blocked,
        )];

        let plan = plan_cycle(&current, &snapshot);
        assert!(plan.report.is_empty());
        assert_eq!(plan.unknown_blocked.len(), 1);
    }

    // ── run ─────────────────────────────────────────────────────────

    fn seed_snapshot(dir: &Path) {
        std::fs::write(
            dir.join("snapshot.json"),
            r#"{"192.168.1.10": ["laptop", "PC", "Allow"]}"#,
        )
        .unwrap();
    }

    fn intruder() -> Device {
        device(
            "AA:BB:CC:DD:EE:FF",
            "192.168.1.99",
            "unknown-phone",
            DeviceStatus::Allowed,
        )
    }

    #[tokio::test]
    async fn missing_snapshot_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let warden = warden_in(dir.path(), FakeSource::with_devices(vec![intruder()]));

        let err = warden.run(false).await.unwrap_err();
        assert!(matches!(err, CoreError::SnapshotMissing { .. }));
    }

    #[tokio::test]
    async fn empty_device_list_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        seed_snapshot(dir.path());
        let warden = warden_in(dir.path(), FakeSource::default());

        let err = warden.run(false).await.unwrap_err();
        assert!(matches!(err, CoreError::EmptyDeviceList { backend: "fake" }));
    }

    #[tokio::test]
    async fn report_only_mode_reports_without_touching_stores() {
        let dir = tempfile::tempdir().unwrap();
        seed_snapshot(dir.path());
        let warden = warden_in(dir.path(), FakeSource::with_devices(vec![intruder()]));

        let summary = warden.run(false).await.unwrap();

        assert_eq!(
            summary.report.entries,
            vec![ThreatEntry {
                name: "unknown-phone".into(),
                mac: "AA:BB:CC:DD:EE:FF".into(),
                ip: "192.168.1.99".into(),
            }]
        );
        assert!(warden.source().calls().is_empty(), "no block command expected");
        assert!(!dir.path().join("blocked.yaml").exists());
    }

    #[tokio::test]
    async fn block_mode_blocks_records_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        seed_snapshot(dir.path());
        let warden = warden_in(dir.path(), FakeSource::with_devices(vec![intruder()]));

        let summary = warden.run(true).await.unwrap();

        assert_eq!(
            warden.source().calls(),
            vec![(MacAddress::new("AA:BB:CC:DD:EE:FF"), DeviceStatus::Blocked)]
        );
        assert_eq!(summary.newly_denied, 1);
        assert_eq!(summary.report.len(), 1);

        let deny = DenyList::load(&dir.path().join("blocked.yaml")).unwrap();
        assert!(deny.contains_mac(&MacAddress::new("AA:BB:CC:DD:EE:FF")));
        assert_eq!(deny.len(), 1);
    }

    #[tokio::test]
    async fn consecutive_cycles_do_not_duplicate_deny_records() {
        let dir = tempfile::tempdir().unwrap();
        seed_snapshot(dir.path());
        let warden = warden_in(dir.path(), FakeSource::with_devices(vec![intruder()]));

        let first = warden.run(true).await.unwrap();
        let second = warden.run(true).await.unwrap();

        assert_eq!(first.newly_denied, 1);
        assert_eq!(second.newly_denied, 0);
        assert_eq!(second.already_denied, 1);
        // still reported: the report is not deduplicated against history
        assert_eq!(second.report.len(), 1);

        let deny = DenyList::load(&dir.path().join("blocked.yaml")).unwrap();
        assert_eq!(deny.len(), 1);
    }

    #[tokio::test]
    async fn failed_block_command_does_not_abort_the_cycle() {
        let dir = tempfile::tempdir().unwrap();
        seed_snapshot(dir.path());
        let source = FakeSource {
            devices: vec![intruder()],
            fail_set_status: true,
            ..FakeSource::default()
        };
        let warden = warden_in(dir.path(), source);

        let summary = warden.run(true).await.unwrap();
        assert_eq!(summary.report.len(), 1);
        assert_eq!(summary.newly_denied, 1);
    }

    #[tokio::test]
    async fn snapshot_is_not_mutated_by_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        seed_snapshot(dir.path());
        let before = std::fs::read_to_string(dir.path().join("snapshot.json")).unwrap();

        let warden = warden_in(dir.path(), FakeSource::with_devices(vec![intruder()]));
        warden.run(true).await.unwrap();

        let after = std::fs::read_to_string(dir.path().join("snapshot.json")).unwrap();
        assert_eq!(before, after);
    }

    // ── create_snapshot ─────────────────────────────────────────────

    #[tokio::test]
    async fn create_snapshot_overwrites_the_baseline() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("snapshot.json"), r#"{"10.0.0.1": ["old", "PC", "Allow"]}"#)
            .unwrap();

        let warden = warden_in(dir.path(), FakeSource::with_devices(vec![intruder()]));
        let captured = warden.create_snapshot().await.unwrap();
        assert_eq!(captured, 1);

        let snapshot = SnapshotStore::load(&dir.path().join("snapshot.json")).unwrap();
        assert!(snapshot.contains("192.168.1.99"));
        assert!(!snapshot.contains("10.0.0.1"));
    }

    // ── always_allow ────────────────────────────────────────────────

    #[tokio::test]
    async fn always_allow_corrects_both_stores_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        seed_snapshot(dir.path());
        let warden = warden_in(dir.path(), FakeSource::with_devices(vec![intruder()]));

        // a prior block-mode cycle left a deny-list record
        warden.run(true).await.unwrap();

        let promoted = warden.always_allow("unknown-phone").await.unwrap();
        assert_eq!(promoted.mac, MacAddress::new("AA:BB:CC:DD:EE:FF"));

        let snapshot = SnapshotStore::load(&dir.path().join("snapshot.json")).unwrap();
        let entry = snapshot.get("192.168.1.99").unwrap();
        assert_eq!(entry.name, "unknown-phone");
        assert_eq!(entry.status, DeviceStatus::Allowed);
        assert!(DenyList::load(&dir.path().join("blocked.yaml")).unwrap().is_empty());

        // second promotion changes nothing
        warden.always_allow("unknown-phone").await.unwrap();
        let snapshot = SnapshotStore::load(&dir.path().join("snapshot.json")).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(DenyList::load(&dir.path().join("blocked.yaml")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn always_allow_requires_the_device_to_be_connected() {
        let dir = tempfile::tempdir().unwrap();
        seed_snapshot(dir.path());
        let warden = warden_in(dir.path(), FakeSource::with_devices(vec![intruder()]));

        let err = warden.always_allow("no-such-device").await.unwrap_err();
        assert!(matches!(err, CoreError::DeviceNotConnected { .. }));
    }

    #[tokio::test]
    async fn resolve_accepts_a_mac_in_any_format() {
        let dir = tempfile::tempdir().unwrap();
        seed_snapshot(dir.path());
        let warden = warden_in(dir.path(), FakeSource::with_devices(vec![intruder()]));

        let by_mac = warden.resolve("aa-bb-cc-dd-ee-ff").await.unwrap();
        assert_eq!(by_mac.name, "unknown-phone");
    }
}
