#![allow(clippy::unwrap_used)]
// Integration tests for `GatewayClient` using wiremock.

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netwarden_api::Error;
use netwarden_api::gateway::GatewayClient;

async fn setup() -> (MockServer, GatewayClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = GatewayClient::with_client(reqwest::Client::new(), &base_url).unwrap();
    (server, client)
}

const PAGE: &str = r#"<html><body><table summary="This table displays LAN devices">
<tr><th>MAC Address</th><td>14:ed:bb:01:02:03</td></tr>
<tr><th>IPv4 Address / Name</th><td>192.168.1.64 / office-pc</td></tr>
<tr><th>Status</th><td>on</td></tr>
<tr><th>Allocation</th><td>dhcp</td></tr>
<tr><th>&nbsp;</th><td></td></tr>
<tr><th>MAC Address</th><td>aa:bb:cc:dd:ee:ff</td></tr>
<tr><th>IPv4 Address / Name</th><td>192.168.1.71 / phone</td></tr>
<tr><th>Status</th><td>off</td></tr>
</table></body></html>"#;

#[tokio::test]
async fn test_get_attached_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/devices.ha"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .mount(&server)
        .await;

    let devices = client.get_attached_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].mac.as_deref(), Some("14:ED:BB:01:02:03"));
    assert_eq!(devices[0].ipv4_address.as_deref(), Some("192.168.1.64"));
    assert_eq!(devices[0].allocation.as_deref(), Some("dhcp"));
    assert_eq!(devices[1].name.as_deref(), Some("phone"));
}

#[tokio::test]
async fn test_error_status_propagates() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/devices.ha"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let result = client.get_attached_devices().await;
    assert!(
        matches!(result, Err(Error::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus, got: {result:?}"
    );
}

#[tokio::test]
async fn test_page_without_table_is_a_parse_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/devices.ha"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login required</html>"))
        .mount(&server)
        .await;

    let result = client.get_attached_devices().await;
    assert!(
        matches!(result, Err(Error::Parse { .. })),
        "expected Parse error, got: {result:?}"
    );
}
