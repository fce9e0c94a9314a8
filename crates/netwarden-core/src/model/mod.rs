//! Domain model shared across the engine, stores, and CLI.

mod device;
mod report;

pub use device::{Device, DeviceStatus, MacAddress};
pub use report::{ThreatEntry, ThreatReport};
