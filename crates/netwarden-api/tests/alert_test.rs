#![allow(clippy::unwrap_used)]
// Integration tests for the alert sinks using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netwarden_api::Error;
use netwarden_api::alert::{AlertMessage, SmsSink, WebhookSink};
use netwarden_api::transport::TransportConfig;

fn message() -> AlertMessage {
    AlertMessage {
        subject: "Netwarden Alert".into(),
        text: "unknown-phone (AA:BB:CC:DD:EE:FF) at 192.168.1.99".into(),
        entries: json!([{"Name": "unknown-phone", "MAC": "AA:BB:CC:DD:EE:FF", "IP": "192.168.1.99"}]),
    }
}

#[tokio::test]
async fn test_webhook_posts_alert_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hooks/netwarden"))
        .and(body_partial_json(json!({
            "subject": "Netwarden Alert",
            "alerts": [{"MAC": "AA:BB:CC:DD:EE:FF"}],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/hooks/netwarden", server.uri())).unwrap();
    let sink = WebhookSink::new(url, None, &TransportConfig::default()).unwrap();
    sink.send(&message()).await.unwrap();
}

#[tokio::test]
async fn test_webhook_failure_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let url = Url::parse(&server.uri()).unwrap();
    let sink = WebhookSink::new(url, None, &TransportConfig::default()).unwrap();

    let result = sink.send(&message()).await;
    assert!(
        matches!(result, Err(Error::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus, got: {result:?}"
    );
}

#[tokio::test]
async fn test_sms_sink_sends_bearer_token_and_recipient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/sms"))
        .and(header("authorization", "Bearer sms-key"))
        .and(body_partial_json(json!({"to": "+15551234567"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/v1/sms", server.uri())).unwrap();
    let key: secrecy::SecretString = "sms-key".to_string().into();
    let sink = SmsSink::new(
        url,
        "+15551234567".into(),
        Some(key),
        &TransportConfig::default(),
    )
    .unwrap();
    sink.send(&message()).await.unwrap();
}
