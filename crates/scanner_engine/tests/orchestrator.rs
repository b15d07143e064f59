use std::sync::{Arc, Mutex};
use std::time::Duration;

use scanner_core::{AppViewModel, NoticeKind, Phase, RiskLevel, GENERIC_FAILURE_MESSAGE};
use scanner_engine::{
    ReqwestDetectionClient, ScanOrchestrator, ScanOutcome, StateSink, TransportSettings,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingSink {
    views: Mutex<Vec<AppViewModel>>,
}

impl RecordingSink {
    fn phases(&self) -> Vec<Phase> {
        self.views.lock().unwrap().iter().map(|view| view.phase).collect()
    }
}

impl StateSink for RecordingSink {
    fn publish(&self, view: AppViewModel) {
        self.views.lock().unwrap().push(view);
    }
}

fn orchestrator_for(server: &MockServer, settings: TransportSettings) -> (ScanOrchestrator, Arc<RecordingSink>) {
    let settings = TransportSettings {
        base_url: Url::parse(&server.uri()).unwrap(),
        ..settings
    };
    let client = Arc::new(ReqwestDetectionClient::new(settings).unwrap());
    let sink = Arc::new(RecordingSink::default());
    (ScanOrchestrator::new(client, sink.clone()), sink)
}

#[tokio::test]
async fn url_scan_publishes_in_flight_then_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_contents_scanned": 10,
            "total_dark_patterns_detected": 4,
            "dark_ratio": 40
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (orchestrator, sink) = orchestrator_for(&server, TransportSettings::default());

    let outcome = orchestrator.run_url_scan("  https://shop.example.com  ").await;

    assert_eq!(outcome, ScanOutcome::Succeeded);
    assert_eq!(sink.phases(), vec![Phase::InFlight, Phase::Succeeded]);
    let view = orchestrator.view();
    let result = view.result.expect("result");
    assert_eq!(result.risk_level, RiskLevel::Medium);
    assert_eq!(result.dark_ratio, 40.0);
    assert!(result.detected_texts.is_empty());
    assert_eq!(view.error_message, None);
    assert_eq!(view.notice.unwrap().message, "Website scan completed.");
}

#[tokio::test]
async fn invalid_input_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": 0})))
        .expect(0)
        .mount(&server)
        .await;
    let (orchestrator, sink) = orchestrator_for(&server, TransportSettings::default());

    let outcome = orchestrator.run_url_scan("ftp://x.com").await;

    assert_eq!(outcome, ScanOutcome::Failed);
    assert_eq!(sink.phases(), vec![Phase::Failed]);
    assert_eq!(
        orchestrator.view().error_message.as_deref(),
        Some("Invalid URL format. Use http:// or https://")
    );
}

#[tokio::test]
async fn text_scan_falls_back_and_normalizes_prediction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-text"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"prediction": 1, "confidence": 0.83})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (orchestrator, _sink) = orchestrator_for(&server, TransportSettings::default());

    let outcome = orchestrator.run_text_scan("Only 2 left! Hurry!").await;

    assert_eq!(outcome, ScanOutcome::Succeeded);
    let view = orchestrator.view();
    let result = view.result.unwrap();
    assert_eq!(result.total_contents_scanned, 1);
    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.detected_texts[0].text, "Input text flagged as suspicious");
    assert_eq!(result.detected_texts[0].confidence, 0.83);
    assert_eq!(view.notice.unwrap().message, "Text scan completed.");
}

#[tokio::test]
async fn server_detail_becomes_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-url"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Failed to fetch URL content"})),
        )
        .mount(&server)
        .await;
    let (orchestrator, sink) = orchestrator_for(&server, TransportSettings::default());

    let outcome = orchestrator.run_url_scan("https://unreachable.example.com").await;

    assert_eq!(outcome, ScanOutcome::Failed);
    assert_eq!(sink.phases(), vec![Phase::InFlight, Phase::Failed]);
    let view = orchestrator.view();
    assert_eq!(view.error_message.as_deref(), Some("Failed to fetch URL content"));
    assert_eq!(view.result, None);
    assert_eq!(view.notice.unwrap().kind, NoticeKind::Error);
}

#[tokio::test]
async fn unrecognized_body_fails_without_partial_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foo": "bar"})))
        .mount(&server)
        .await;
    let (orchestrator, _sink) = orchestrator_for(&server, TransportSettings::default());

    let outcome = orchestrator.run_url_scan("https://a.com").await;

    assert_eq!(outcome, ScanOutcome::Failed);
    let view = orchestrator.view();
    assert_eq!(view.result, None);
    assert_eq!(view.error_message.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
}

#[tokio::test]
async fn timeout_surfaces_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-url"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"prediction": 0})),
        )
        .mount(&server)
        .await;
    let settings = TransportSettings {
        request_timeout: Duration::from_millis(50),
        ..TransportSettings::default()
    };
    let (orchestrator, _sink) = orchestrator_for(&server, settings);

    let outcome = orchestrator.run_url_scan("https://slow.example.com").await;

    assert_eq!(outcome, ScanOutcome::Failed);
    assert_eq!(
        orchestrator.view().error_message.as_deref(),
        Some(GENERIC_FAILURE_MESSAGE)
    );
}

#[tokio::test]
async fn second_scan_while_in_flight_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-url"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({"prediction": 0})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (orchestrator, sink) = orchestrator_for(&server, TransportSettings::default());
    let orchestrator = Arc::new(orchestrator);

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.run_url_scan("https://first.example.com").await })
    };
    // Wait until the first scan is in flight.
    while orchestrator.view().phase != Phase::InFlight {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let before = orchestrator.view();

    let second = orchestrator.run_url_scan("https://second.example.com").await;
    let third = orchestrator.run_text_scan("").await;

    assert_eq!(second, ScanOutcome::Rejected);
    assert_eq!(third, ScanOutcome::Rejected);
    assert_eq!(orchestrator.view(), before);

    assert_eq!(first.await.unwrap(), ScanOutcome::Succeeded);
    assert_eq!(sink.phases(), vec![Phase::InFlight, Phase::Succeeded]);
}

#[tokio::test]
async fn orchestrator_is_reusable_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": 0})))
        .mount(&server)
        .await;
    let (orchestrator, sink) = orchestrator_for(&server, TransportSettings::default());

    assert_eq!(orchestrator.run_text_scan("   ").await, ScanOutcome::Failed);
    assert_eq!(orchestrator.run_text_scan("Free shipping").await, ScanOutcome::Succeeded);

    assert_eq!(
        sink.phases(),
        vec![Phase::Failed, Phase::InFlight, Phase::Succeeded]
    );
    let view = orchestrator.view();
    assert_eq!(view.result.unwrap().risk_level, RiskLevel::Low);
    assert_eq!(view.error_message, None);
}
