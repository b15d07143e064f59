use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use scan_logging::{scan_debug, scan_info};
use scanner_core::{ScanKind, ScanRequest};
use serde_json::Value;
use url::Url;

use crate::{Endpoint, FailureKind, TransportError};

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Upper bound for a whole request; exceeding it is a `FailureKind::Timeout`.
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl TransportSettings {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(Self::DEFAULT_BASE_URL).expect("default base url is valid"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait DetectionClient: Send + Sync {
    /// POST `payload` to `endpoint` and return the decoded JSON body of a 2xx response.
    async fn post(&self, endpoint: Endpoint, payload: &str) -> Result<Value, TransportError>;
}

/// Issue the request for `request.kind`.
///
/// A text scan answered with 404 is retried once against `/analyze`; the
/// outcome of that second call is final.
pub async fn detect(
    client: &dyn DetectionClient,
    request: &ScanRequest,
) -> Result<Value, TransportError> {
    match request.kind {
        ScanKind::UrlScan => client.post(Endpoint::DetectFromUrl, &request.payload).await,
        ScanKind::TextScan => match client.post(Endpoint::DetectFromText, &request.payload).await {
            Err(err) if err.is_not_found() => {
                scan_info!(
                    "{} not found, falling back to {}",
                    Endpoint::DetectFromText,
                    Endpoint::Analyze
                );
                client.post(Endpoint::Analyze, &request.payload).await
            }
            other => other,
        },
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestDetectionClient {
    settings: TransportSettings,
    client: reqwest::Client,
}

impl ReqwestDetectionClient {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, TransportError> {
        // Join relative to the base path so a base like `http://host/api` keeps `/api`.
        let mut base = self.settings.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(endpoint.path().trim_start_matches('/'))
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(TransportError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(TransportError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl DetectionClient for ReqwestDetectionClient {
    async fn post(&self, endpoint: Endpoint, payload: &str) -> Result<Value, TransportError> {
        let url = self.endpoint_url(endpoint)?;
        let body = endpoint.request_body(payload).to_string();
        scan_debug!("POST {} payload_len={}", url, payload.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = self.read_body(response).await?;

        if !status.is_success() {
            let error_body = serde_json::from_slice::<Value>(&bytes).ok();
            return Err(
                TransportError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
                    .with_body(error_body),
            );
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| TransportError::new(FailureKind::InvalidBody, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
