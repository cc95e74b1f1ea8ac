//! Tests for the webhook notifier
//!
//! Uses a local tiny_http server as the endpoint.

use std::net::TcpListener;
use std::time::{Duration, Instant};

use checkin::adapters::{DisabledNotifier, RetryPolicy, WebhookNotifier};
use checkin::config::WebhookConfig;
use checkin::core::models::CheckInPayload;
use checkin::core::ports::{Delivery, Notifier};
use reqwest::Url;
use tiny_http::Server;
use tokio::runtime::Runtime;

use crate::common::{WebhookReceiver, id};

fn notifier(
    url: &str,
    runtime: &Runtime,
    timeout: Duration,
    retry: RetryPolicy,
) -> WebhookNotifier {
    let url = Url::parse(url).unwrap();
    WebhookNotifier::new(url, timeout, retry, runtime.handle().clone()).unwrap()
}

#[test]
fn posts_json_username() {
    let runtime = Runtime::new().unwrap();
    let receiver = WebhookReceiver::start();
    let notifier =
        notifier(receiver.url(), &runtime, Duration::from_secs(5), RetryPolicy::default());

    let delivery = notifier.notify(CheckInPayload::for_identity(&id("alice")));
    assert_eq!(delivery, Delivery::Dispatched);

    let body = receiver.recv(Duration::from_secs(5)).expect("no request received");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "username": "alice" }));

    notifier.flush(Duration::from_secs(5));
}

#[test]
fn error_status_is_not_retried() {
    let runtime = Runtime::new().unwrap();
    let receiver = WebhookReceiver::start_with_status(500);
    let retry = RetryPolicy {
        max_attempts: 3,
        backoff: Duration::from_millis(10),
    };
    let notifier = notifier(receiver.url(), &runtime, Duration::from_secs(5), retry);

    notifier.notify(CheckInPayload::missing_identity());
    assert!(receiver.recv(Duration::from_secs(5)).unwrap().contains("\"error\""));
    notifier.flush(Duration::from_secs(5));

    assert!(receiver.stays_quiet(Duration::from_millis(300)));
}

#[test]
fn unreachable_endpoint_is_swallowed() {
    let runtime = Runtime::new().unwrap();
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let retry = RetryPolicy {
        max_attempts: 2,
        backoff: Duration::from_millis(10),
    };
    let notifier =
        notifier(&format!("http://127.0.0.1:{port}/hook"), &runtime, Duration::from_secs(1), retry);

    assert_eq!(notifier.notify(CheckInPayload::for_identity(&id("bob"))), Delivery::Dispatched);
    notifier.flush(Duration::from_secs(5));
}

#[test]
fn slow_endpoint_does_not_block() {
    let runtime = Runtime::new().unwrap();
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let notifier = notifier(
        &format!("http://{addr}/hook"),
        &runtime,
        Duration::from_millis(300),
        RetryPolicy::default(),
    );

    let started = Instant::now();
    notifier.notify(CheckInPayload::for_identity(&id("carol")));
    assert!(started.elapsed() < Duration::from_secs(1));

    // Hold the request without answering; the client timeout ends the wait
    let held = server.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(held.is_some());

    let started = Instant::now();
    notifier.flush(Duration::from_secs(10));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn disabled_notifier_sends_nothing() {
    let notifier = DisabledNotifier::new();
    assert!(!notifier.is_enabled());
    assert_eq!(notifier.notify(CheckInPayload::for_identity(&id("dave"))), Delivery::Disabled);
}

#[test]
fn from_config_picks_disabled_without_url() {
    let runtime = Runtime::new().unwrap();
    let notifier =
        checkin::adapters::webhook::from_config(&WebhookConfig::default(), runtime.handle().clone())
            .unwrap();
    assert!(!notifier.is_enabled());
}

#[test]
fn from_config_builds_webhook() {
    let runtime = Runtime::new().unwrap();
    let config = WebhookConfig {
        url: Some("http://127.0.0.1:9/hook".to_string()),
        ..WebhookConfig::default()
    };
    let notifier =
        checkin::adapters::webhook::from_config(&config, runtime.handle().clone()).unwrap();
    assert!(notifier.is_enabled());
}
