// netwarden-core: snapshot-diff reconciliation engine, stores, and alerting

mod convert;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod source;
pub mod store;

pub use engine::{CyclePlan, CycleSummary, StorePaths, Warden, plan_cycle};
pub use error::CoreError;
pub use model::{Device, DeviceStatus, MacAddress, ThreatEntry, ThreatReport};
pub use notify::{AlertGate, Notifier};
pub use source::{AnySource, DeviceSource, GatewaySource, NetgearSource};
pub use store::{DenyList, DenyRecord, SnapshotEntry, SnapshotStore};
