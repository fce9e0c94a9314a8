// Conversions from raw backend records into the domain `Device`.

use netwarden_api::gateway::GatewayDevice;
use netwarden_api::netgear::AttachedDevice;

use crate::model::{Device, DeviceStatus, MacAddress};

impl From<AttachedDevice> for Device {
    fn from(raw: AttachedDevice) -> Self {
        // old firmware omits the allow/block column; a device the router
        // does not mark as blocked is treated as allowed
        let status = match raw.allow_or_block.as_deref() {
            Some("Block") => DeviceStatus::Blocked,
            _ => DeviceStatus::Allowed,
        };
        Self {
            mac: MacAddress::new(&raw.mac),
            ip: Some(raw.ip).filter(|ip| !ip.is_empty()),
            name: raw.name,
            kind: raw.connection_type.unwrap_or_else(|| "unknown".into()),
            status,
            signal: raw.signal,
            last_activity: None,
        }
    }
}

/// Convert a scraped gateway record, dropping records without a MAC.
///
/// The status page has no access-control state, so every device it reports
/// is `Allowed` -- there is nothing the gateway could have blocked.
pub(crate) fn gateway_device(raw: GatewayDevice) -> Option<Device> {
    let Some(mac) = raw.mac else {
        tracing::warn!(?raw, "skipping gateway record without a MAC address");
        return None;
    };
    Some(Device {
        mac: MacAddress::new(mac),
        ip: raw.ipv4_address,
        name: raw.name.unwrap_or_else(|| "unknown".into()),
        kind: raw.connection_type.unwrap_or_else(|| "unknown".into()),
        status: DeviceStatus::Allowed,
        signal: None,
        last_activity: raw.last_activity,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use netwarden_api::gateway::GatewayDevice;
    use netwarden_api::netgear::AttachedDevice;
    use pretty_assertions::assert_eq;

    use super::gateway_device;
    use crate::model::{Device, DeviceStatus};

    #[test]
    fn netgear_record_maps_status_and_offline_ip() {
        let raw = AttachedDevice {
            ip: String::new(),
            name: "tv".into(),
            mac: "AA:BB:CC:00:11:22".into(),
            connection_type: Some("wired".into()),
            link_rate: Some(1000),
            signal: Some(0),
            allow_or_block: Some("Block".into()),
        };
        let device = Device::from(raw);
        assert_eq!(device.ip, None);
        assert_eq!(device.status, DeviceStatus::Blocked);
        assert_eq!(device.kind, "wired");
    }

    #[test]
    fn gateway_record_requires_a_mac() {
        let with_mac = GatewayDevice {
            mac: Some("aa:bb:cc:dd:ee:ff".into()),
            ipv4_address: Some("192.168.1.71".into()),
            name: Some("phone".into()),
            ..GatewayDevice::default()
        };
        let device = gateway_device(with_mac).unwrap();
        assert_eq!(device.mac.as_str(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(device.status, DeviceStatus::Allowed);

        assert!(gateway_device(GatewayDevice::default()).is_none());
    }
}
