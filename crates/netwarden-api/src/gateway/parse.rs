// Device-table extraction for the gateway status page.
//
// The page is a single two-column table: label rows (`<th>` or first `<td>`)
// paired with values, one group of rows per device, groups separated by a
// row with an empty label cell. The combined "IPv4 Address / Name" row
// carries both fields split on '/'. No HTML parsing crate in our stack
// covers tag soup, and this page is a fixed firmware template, so a narrow
// scanner is used instead of a DOM.

/// One device scraped from the gateway status page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayDevice {
    pub mac: Option<String>,
    pub ipv4_address: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub last_activity: Option<String>,
    pub allocation: Option<String>,
    pub connection_type: Option<String>,
    pub connection_speed: Option<String>,
    pub mesh_client: Option<String>,
}

impl GatewayDevice {
    fn is_empty(&self) -> bool {
        self.mac.is_none()
            && self.ipv4_address.is_none()
            && self.name.is_none()
            && self.status.is_none()
    }

    fn apply(&mut self, label: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match label {
            "mac address" => self.mac = Some(value.to_uppercase()),
            "ipv4 address / name" => {
                let (ip, name) = value.split_once('/').unwrap_or((value, ""));
                let ip = ip.trim();
                let name = name.trim();
                if !ip.is_empty() {
                    self.ipv4_address = Some(ip.to_owned());
                }
                if !name.is_empty() {
                    self.name = Some(name.to_owned());
                }
            }
            "status" => self.status = Some(value.to_owned()),
            "last activity" => self.last_activity = Some(value.to_owned()),
            "allocation" => self.allocation = Some(value.to_owned()),
            "connection type" => self.connection_type = Some(value.to_owned()),
            "connection speed" => self.connection_speed = Some(value.to_owned()),
            "mesh client" => self.mesh_client = Some(value.to_owned()),
            _ => {}
        }
    }
}

/// Extract every device record from the status-page HTML.
///
/// Rows whose label cell is empty separate device groups, matching the
/// blank separator rows in the firmware template. Groups that never carry
/// a MAC address are dropped (there is nothing to key them on).
pub(crate) fn parse_devices(html: &str) -> Vec<GatewayDevice> {
    let mut devices = Vec::new();
    let mut current = GatewayDevice::default();

    for row in rows(html) {
        let cells = row_cells(row);
        let label = cells.first().map_or_else(String::new, |c| c.to_lowercase());

        if label.is_empty() {
            // separator row closes the current device group
            if !current.is_empty() {
                devices.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(value) = cells.get(1) {
            current.apply(label.trim(), value);
        }
    }
    if !current.is_empty() {
        devices.push(current);
    }

    devices.retain(|d| d.mac.is_some());
    devices
}

// ── Tag-soup scanning helpers ────────────────────────────────────────

/// Iterate over the inner HTML of each `<tr>` element.
fn rows(html: &str) -> impl Iterator<Item = &str> {
    let lower = html.to_lowercase();
    let mut pos = 0;
    std::iter::from_fn(move || {
        let start = lower[pos..].find("<tr")? + pos;
        let open_end = lower[start..].find('>')? + start + 1;
        let close = lower[open_end..]
            .find("</tr")
            .map_or(lower.len(), |i| i + open_end);
        pos = close;
        html.get(open_end..close)
    })
}

/// Extract the text of each `<th>`/`<td>` cell in a row, in order.
fn row_cells(row: &str) -> Vec<String> {
    let lower = row.to_lowercase();
    let mut cells = Vec::new();
    let mut pos = 0;
    while let Some(rel) = next_cell_open(&lower[pos..]) {
        let start = pos + rel;
        let Some(open_end) = lower[start..].find('>').map(|i| i + start + 1) else {
            break;
        };
        let close = ["</th", "</td", "<th", "<td"]
            .iter()
            .filter_map(|m| lower[open_end..].find(m))
            .min()
            .map_or(lower.len(), |i| i + open_end);
        if let Some(inner) = row.get(open_end..close) {
            cells.push(decode_entities(&strip_tags(inner)).trim().to_owned());
        }
        pos = close.max(open_end);
    }
    cells
}

fn next_cell_open(s: &str) -> Option<usize> {
    match (s.find("<th"), s.find("<td")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Remove every `<...>` span, keeping the text between tags.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decode the handful of entities the firmware template actually emits.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::parse_devices;

    const PAGE: &str = r#"
<html><body><table>
  <tr><th>MAC Address</th><td>14:ed:bb:01:02:03</td></tr>
  <tr><th>IPv4 Address / Name</th><td>192.168.1.64 / office-pc</td></tr>
  <tr><th>Status</th><td>on</td></tr>
  <tr><th>Last Activity</th><td>Mon Mar  3 10:01:02 2025</td></tr>
  <tr><th>Connection Type</th><td>Wi-Fi 5GHz</td></tr>
  <tr><th>&nbsp;</th><td></td></tr>
  <tr><th>MAC Address</th><td>aa:bb:cc:dd:ee:ff</td></tr>
  <tr><th>IPv4 Address / Name</th><td>192.168.1.71 / ann&#39;s phone</td></tr>
  <tr><th>Status</th><td>off</td></tr>
</table></body></html>"#;

    #[test]
    fn splits_device_groups_on_blank_label_rows() {
        let devices = parse_devices(PAGE);
        assert_eq!(devices.len(), 2);

        assert_eq!(devices[0].mac.as_deref(), Some("14:ED:BB:01:02:03"));
        assert_eq!(devices[0].ipv4_address.as_deref(), Some("192.168.1.64"));
        assert_eq!(devices[0].name.as_deref(), Some("office-pc"));
        assert_eq!(devices[0].connection_type.as_deref(), Some("Wi-Fi 5GHz"));

        assert_eq!(devices[1].mac.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(devices[1].name.as_deref(), Some("ann's phone"));
        assert_eq!(devices[1].status.as_deref(), Some("off"));
    }

    #[test]
    fn drops_groups_without_a_mac() {
        let html = "<table><tr><th>Status</th><td>on</td></tr></table>";
        assert!(parse_devices(html).is_empty());
    }

    #[test]
    fn tolerates_markup_inside_cells() {
        let html = "<table><tr><th><b>MAC Address</b></th>\
                    <td><span>00:11:22:33:44:55</span></td></tr></table>";
        let devices = parse_devices(html);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].mac.as_deref(), Some("00:11:22:33:44:55"));
    }
}
