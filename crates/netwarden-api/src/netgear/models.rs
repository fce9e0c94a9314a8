// Netgear SOAP payload types
//
// The attached-device list comes back as a single `;`/`@`-delimited record
// string inside the SOAP envelope, not as structured XML. Field count varies
// across firmware versions, so everything past the MAC is optional.

/// Per-MAC access state as the router spells it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowOrBlock {
    Allow,
    Block,
}

impl AllowOrBlock {
    /// The exact string the SOAP interface expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Block => "Block",
        }
    }
}

impl std::fmt::Display for AllowOrBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attached device as reported by `GetAttachDevice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedDevice {
    pub ip: String,
    pub name: String,
    pub mac: String,
    pub connection_type: Option<String>,
    pub link_rate: Option<u32>,
    /// Signal strength in percent.
    pub signal: Option<i32>,
    /// `"Allow"` or `"Block"` on recent firmware, absent on old ones.
    pub allow_or_block: Option<String>,
}

/// Parse the `NewAttachDevice` record string.
///
/// Format: `{count}@{rec}@{rec}...` where each record is
/// `index;ip;name;mac[;connection_type[;link_rate[;signal[;allow_or_block]]]]`.
/// Records with fewer than four fields are skipped with a warning rather
/// than failing the whole listing.
pub(crate) fn parse_attach_device(raw: &str) -> Vec<AttachedDevice> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut devices = Vec::new();
    for chunk in raw.split('@') {
        if !chunk.contains(';') {
            // leading device-count token
            continue;
        }
        let fields: Vec<&str> = chunk.split(';').collect();
        if fields.len() < 4 {
            tracing::warn!(record = chunk, "skipping malformed device record");
            continue;
        }
        devices.push(AttachedDevice {
            ip: fields[1].trim().to_owned(),
            name: fields[2].trim().to_owned(),
            mac: fields[3].trim().to_uppercase(),
            connection_type: fields.get(4).map(|s| s.trim().to_owned()),
            link_rate: fields.get(5).and_then(|s| s.trim().parse().ok()),
            signal: fields.get(6).and_then(|s| s.trim().parse().ok()),
            allow_or_block: fields
                .get(7)
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
        });
    }
    devices
}
