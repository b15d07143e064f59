use std::fmt;

use serde::Serialize;

use crate::RiskLevel;

/// Snippet text reported when a single-prediction response flags the input.
pub const FLAGGED_INPUT_PLACEHOLDER: &str = "Input text flagged as suspicious";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanKind {
    UrlScan,
    TextScan,
}

impl ScanKind {
    /// Notification shown once a scan of this kind completes.
    pub fn completion_message(self) -> &'static str {
        match self {
            ScanKind::UrlScan => "Website scan completed.",
            ScanKind::TextScan => "Text scan completed.",
        }
    }

    /// Label for the triggering control while a scan of this kind is in flight.
    pub fn busy_label(self) -> &'static str {
        match self {
            ScanKind::UrlScan => "Scanning website...",
            ScanKind::TextScan => "Scanning text...",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanKind::UrlScan => f.write_str("url"),
            ScanKind::TextScan => f.write_str("text"),
        }
    }
}

/// A validated request, alive only for the duration of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub kind: ScanKind,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedSnippet {
    pub text: String,
    pub confidence: f64,
}

/// Canonical scan result. Only `normalize` builds these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub total_contents_scanned: u64,
    pub total_dark_patterns_detected: u64,
    pub dark_ratio: f64,
    pub risk_level: RiskLevel,
    pub detected_texts: Vec<DetectedSnippet>,
}
