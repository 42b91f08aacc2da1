//! End-to-end advisory flow against a mock backend: health monitor binds an
//! endpoint, the dispatcher talks to it, and falls back when it goes away.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use agrisakha::advisory::HttpBackend;
use agrisakha::{
    AgriConfig, ConnectivityState, Dispatcher, HealthMonitor, ImagePayload, Language, Query, Role,
    Transcript, fallback,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(urls: Vec<String>) -> AgriConfig {
    let mut config = AgriConfig::default();
    config.endpoints.urls = urls;
    config.monitor.probe_timeout_ms = 500;
    config.monitor.interval_secs = 3_600;
    config.dispatch.text_timeout_ms = 1_000;
    config.dispatch.image_timeout_ms = 1_000;
    config
}

async fn healthy(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(server)
        .await;
}

struct Running {
    dispatcher: Dispatcher,
    cancel: CancellationToken,
}

impl Running {
    async fn start(config: &AgriConfig) -> Self {
        let monitor = HealthMonitor::new(config).unwrap();
        let handle = monitor.handle();
        let mut watch = handle.watch();
        let cancel = CancellationToken::new();
        monitor.spawn(cancel.clone());
        tokio::time::timeout(
            Duration::from_secs(3),
            watch.wait_for(|s| !matches!(s, ConnectivityState::Checking)),
        )
        .await
        .unwrap()
        .unwrap();

        let dispatcher = Dispatcher::new(
            config,
            Arc::new(HttpBackend::new(config).unwrap()),
            handle,
            Transcript::new(),
        );
        Self { dispatcher, cancel }
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[tokio::test]
async fn live_backend_answers_text_query() {
    let server = MockServer::start().await;
    healthy(&server).await;
    Mock::given(method("POST"))
        .and(path("/advisory"))
        .and(body_partial_json(json!({"language": "Hindi", "location": "Delhi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "advice": "नवंबर में बुआई करें",
            "language": "Hindi",
            "confidence": 0.85
        })))
        .expect(1)
        .mount(&server)
        .await;

    let running = Running::start(&config_for(vec![server.uri()])).await;
    let message = running
        .dispatcher
        .submit(Query::from_text("गेहूं की बुआई", Language::Hindi))
        .await
        .unwrap();

    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.text, "नवंबर में बुआई करें");
    assert!(!message.degraded);
    assert_eq!(running.dispatcher.transcript().len(), 1);
}

#[tokio::test]
async fn image_upload_yields_diagnosis() {
    let server = MockServer::start().await;
    healthy(&server).await;
    Mock::given(method("POST"))
        .and(path("/upload-image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filename": "20250101_leaf.jpg",
            "detected_disease": "early_blight",
            "confidence": 0.91,
            "analysis": "Concentric rings on lower leaves.",
            "recommendations": "Remove infected leaves\nApply copper fungicide"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let running = Running::start(&config_for(vec![server.uri()])).await;
    let image = ImagePayload::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "leaf.jpg", "image/jpeg");
    let message = running
        .dispatcher
        .submit(Query::from_image(image, Language::English))
        .await
        .unwrap();

    let diagnosis = message.diagnosis.expect("structured diagnosis");
    assert_eq!(diagnosis.disease.as_deref(), Some("early_blight"));
    assert_eq!(
        diagnosis.disease_label(Language::English).as_deref(),
        Some("EARLY BLIGHT")
    );
    assert!(!message.degraded);
}

#[tokio::test]
async fn no_reachable_endpoint_answers_locally() {
    let running = Running::start(&config_for(vec!["http://127.0.0.1:59993".into()])).await;
    assert_eq!(
        running.dispatcher.monitor().current(),
        ConnectivityState::Disconnected
    );

    let query = Query::from_text("What's the best fertilizer for wheat?", Language::English);
    let message = running.dispatcher.submit(query.clone()).await.unwrap();

    assert!(message.degraded);
    assert_eq!(message.text, fallback::generate(&query, Language::English));
    assert!(message.text.contains("Wheat Cultivation Guide"));
}

#[tokio::test]
async fn server_error_falls_back_but_stays_connected() {
    let server = MockServer::start().await;
    healthy(&server).await;
    Mock::given(method("POST"))
        .and(path("/advisory"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&server)
        .await;

    let running = Running::start(&config_for(vec![server.uri()])).await;
    let message = running
        .dispatcher
        .submit(Query::from_text("pest control", Language::English))
        .await
        .unwrap();

    assert!(message.degraded);
    assert!(fallback::is_demo_text(&message.text));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(running.dispatcher.monitor().current().is_connected());
}

#[tokio::test]
async fn slow_backend_times_out_and_late_reply_is_dropped() {
    let server = MockServer::start().await;
    healthy(&server).await;
    Mock::given(method("POST"))
        .and(path("/advisory"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"advice": "late"}))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(vec![server.uri()]);
    config.dispatch.text_timeout_ms = 200;
    let running = Running::start(&config).await;

    let message = running
        .dispatcher
        .submit(Query::from_text("rice", Language::English))
        .await
        .unwrap();
    assert!(message.degraded);

    tokio::time::sleep(Duration::from_millis(800)).await;
    let transcript = running.dispatcher.transcript().snapshot();
    assert_eq!(transcript.len(), 1);
    assert!(transcript.iter().all(|m| m.text != "late"));
}

#[tokio::test]
async fn empty_query_is_rejected_before_dispatch() {
    let server = MockServer::start().await;
    healthy(&server).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let running = Running::start(&config_for(vec![server.uri()])).await;
    let err = running
        .dispatcher
        .submit(Query::from_text("", Language::English))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(running.dispatcher.transcript().is_empty());
}
