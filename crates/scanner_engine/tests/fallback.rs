use scanner_core::{ScanKind, ScanRequest};
use scanner_engine::{detect, FailureKind, ReqwestDetectionClient, TransportSettings};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestDetectionClient {
    let settings = TransportSettings::with_base_url(Url::parse(&server.uri()).unwrap());
    ReqwestDetectionClient::new(settings).unwrap()
}

fn text_request(payload: &str) -> ScanRequest {
    ScanRequest {
        kind: ScanKind::TextScan,
        payload: payload.to_string(),
    }
}

#[tokio::test]
async fn text_scan_falls_back_to_analyze_once_on_404() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-text"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not Found"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_json(json!({"text": "Only 2 left! Hurry!"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"prediction": 1, "confidence": 0.83})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = detect(&client, &text_request("Only 2 left! Hurry!"))
        .await
        .expect("fallback succeeds");

    assert_eq!(body, json!({"prediction": 1, "confidence": 0.83}));
}

#[tokio::test]
async fn fallback_404_is_final() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-text"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = detect(&client, &text_request("Hurry!")).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn other_text_failures_do_not_fall_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-text"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "model offline"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": 0})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = detect(&client, &text_request("Hurry!")).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn url_scan_never_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-from-url"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": 0})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ScanRequest {
        kind: ScanKind::UrlScan,
        payload: "https://a.com".to_string(),
    };
    let err = detect(&client, &request).await.unwrap_err();

    assert!(err.is_not_found());
}
