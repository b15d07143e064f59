use url::Url;

use crate::{Phase, ScanKind, ScanRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("input is empty")]
    EmptyInput,
    #[error("not an absolute http(s) url with a host")]
    MalformedUrl,
}

impl ValidationError {
    /// Message shown to the user for this failure on a scan of `kind`.
    pub fn user_message(self, kind: ScanKind) -> &'static str {
        match (self, kind) {
            (ValidationError::EmptyInput, ScanKind::UrlScan) => "Please enter a URL to scan.",
            (ValidationError::EmptyInput, ScanKind::TextScan) => "Please enter text to analyze.",
            (ValidationError::MalformedUrl, _) => "Invalid URL format. Use http:// or https://",
        }
    }
}

/// Trim `raw` and accept it only as an absolute `http`/`https` URL with a non-empty host.
pub fn validate_url(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let parsed = Url::parse(trimmed).map_err(|_| ValidationError::MalformedUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::MalformedUrl);
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ValidationError::MalformedUrl),
    }
}

/// Trim `raw` and reject it if nothing is left. No length ceiling.
pub fn validate_text(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(trimmed.to_string())
}

pub fn validate(kind: ScanKind, raw: &str) -> Result<ScanRequest, ValidationError> {
    let payload = match kind {
        ScanKind::UrlScan => validate_url(raw)?,
        ScanKind::TextScan => validate_text(raw)?,
    };
    Ok(ScanRequest { kind, payload })
}

/// Whether the triggering control should be enabled for the current input.
pub fn can_submit(raw: &str, phase: Phase) -> bool {
    phase != Phase::InFlight && !raw.trim().is_empty()
}
