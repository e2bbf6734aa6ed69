//! Delivery tests for the HTTP based notifiers
//!
//! These tests verify that:
//! - SMS notifications hit the Twilio Messages endpoint with auth and form body
//! - Webhook notifications post the subject and message as JSON
//! - Non-success responses surface as `NotifyError::Rejected`
//! - Endpoints that never answer in time fail instead of hanging the notifier

use std::time::Duration;

use assert_matches::assert_matches;
use resource_monitor::{
    config::{SmsConfig, WebhookConfig},
    notifiers::{Notifier, NotifyError, SmsNotifier, WebhookNotifier},
};
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sms_config(api_base: String) -> SmsConfig {
    SmsConfig {
        account_sid: "AC123".to_string(),
        auth_token: "secret".to_string(),
        from_number: "+15550000000".to_string(),
        to_number: "+15551111111".to_string(),
        api_base,
    }
}

#[tokio::test]
async fn test_sms_posts_message_to_twilio() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
        .and(header_exists("authorization"))
        .and(body_string_contains("Body=High+CPU+Usage+Alert"))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"sid":"SM1"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = SmsNotifier::new(sms_config(mock_server.uri()));

    notifier
        .send(
            "High CPU Usage Alert",
            "High CPU Usage Alert on test-host: CPU usage is at 85%",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sms_rejection_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&mock_server)
        .await;

    let notifier = SmsNotifier::new(sms_config(mock_server.uri()));

    let result = notifier.send("subject", "message").await;

    assert_matches!(
        result,
        Err(NotifyError::Rejected { status: 401, body }) if body == "invalid credentials"
    );
}

#[tokio::test]
async fn test_sms_unreachable_api_is_http_error() {
    let notifier = SmsNotifier::new(sms_config("http://127.0.0.1:9".to_string()));

    let result = notifier.send("subject", "message").await;

    assert_matches!(result, Err(NotifyError::Http(_)));
}

#[tokio::test]
async fn test_webhook_posts_json_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_string_contains(r#""subject":"High Disk Usage Alert""#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = WebhookNotifier::new(WebhookConfig {
        url: format!("{}/hook", mock_server.uri()),
    });

    notifier
        .send(
            "High Disk Usage Alert",
            "High Disk Usage Alert on test-host: Disk usage is at 91.5%",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_webhook_server_error_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let notifier = WebhookNotifier::new(WebhookConfig {
        url: format!("{}/hook", mock_server.uri()),
    });

    let result = notifier.send("subject", "message").await;

    assert_matches!(result, Err(NotifyError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn test_sms_slow_api_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let notifier =
        SmsNotifier::with_timeout(sms_config(mock_server.uri()), Duration::from_millis(100));

    let result = notifier.send("subject", "message").await;

    assert_matches!(result, Err(NotifyError::Http(e)) if e.is_timeout());
}

#[tokio::test]
async fn test_webhook_slow_endpoint_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let notifier = WebhookNotifier::with_timeout(
        WebhookConfig {
            url: format!("{}/hook", mock_server.uri()),
        },
        Duration::from_millis(100),
    );

    let result = notifier.send("subject", "message").await;

    assert_matches!(result, Err(NotifyError::Http(e)) if e.is_timeout());
}
