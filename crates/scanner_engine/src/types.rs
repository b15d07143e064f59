use std::fmt;

use serde_json::{json, Value};

/// Detection service routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    DetectFromUrl,
    DetectFromText,
    /// Secondary text route, used when `DetectFromText` is not deployed.
    Analyze,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::DetectFromUrl => "/detect-from-url",
            Endpoint::DetectFromText => "/detect-from-text",
            Endpoint::Analyze => "/analyze",
        }
    }

    pub fn request_body(self, payload: &str) -> Value {
        match self {
            Endpoint::DetectFromUrl => json!({ "url": payload }),
            Endpoint::DetectFromText | Endpoint::Analyze => json!({ "text": payload }),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
    /// Decoded JSON error body, when the server sent one.
    pub body: Option<Value>,
}

impl TransportError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == FailureKind::HttpStatus(404)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Success status with a body that is not JSON.
    InvalidBody,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidBody => write!(f, "invalid response body"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}
