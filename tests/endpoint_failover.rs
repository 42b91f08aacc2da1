//! Endpoint priority and failover through the public monitor API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use agrisakha::advisory::HttpBackend;
use agrisakha::{AgriConfig, ConnectivityState, Dispatcher, HealthMonitor, Language, Query, Transcript};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn later_endpoints_are_not_probed_once_one_is_live() {
    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&down)
        .await;
    let live = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&live)
        .await;
    let spare = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&spare)
        .await;

    let mut config = AgriConfig::default();
    config.endpoints.urls = vec![down.uri(), live.uri(), spare.uri()];
    let monitor = HealthMonitor::new(&config).unwrap();

    assert_eq!(
        monitor.probe().await,
        ConnectivityState::Connected {
            endpoint: live.uri()
        }
    );
}

#[tokio::test]
async fn dropped_endpoint_fails_over_to_the_next() {
    // Primary answers one health check, then refuses advisory traffic at
    // the transport level by delaying past the request deadline.
    let primary = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&primary)
        .await;
    Mock::given(method("POST"))
        .and(path("/advisory"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&primary)
        .await;

    let secondary = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&secondary)
        .await;

    let mut config = AgriConfig::default();
    config.endpoints.urls = vec![primary.uri(), secondary.uri()];
    config.monitor.interval_secs = 3_600;
    config.monitor.probe_timeout_ms = 500;
    config.dispatch.text_timeout_ms = 200;

    let monitor = HealthMonitor::new(&config).unwrap();
    let handle = monitor.handle();
    let mut watch = handle.watch();
    let cancel = CancellationToken::new();
    let task = monitor.spawn(cancel.clone());

    let primary_uri = primary.uri();
    tokio::time::timeout(
        Duration::from_secs(2),
        watch.wait_for(|s| s.endpoint() == Some(primary_uri.as_str())),
    )
    .await
    .unwrap()
    .unwrap();

    let dispatcher = Dispatcher::new(
        &config,
        Arc::new(HttpBackend::new(&config).unwrap()),
        handle.clone(),
        Transcript::new(),
    );
    let message = dispatcher
        .submit(Query::from_text("irrigation schedule", Language::English))
        .await
        .unwrap();
    assert!(message.degraded);

    let secondary_uri = secondary.uri();
    let state = tokio::time::timeout(
        Duration::from_secs(3),
        watch.wait_for(|s| s.endpoint() == Some(secondary_uri.as_str())),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(state.is_connected());

    cancel.cancel();
    task.await.unwrap();
}
