use scanner_core::GENERIC_FAILURE_MESSAGE;
use serde_json::Value;

use crate::TransportError;

/// Turn a failed request into a message fit for display.
///
/// Prefers the server's `message` field, then its `detail` field, then a fixed
/// fallback. Transport internals never reach the user.
pub fn translate(error: &TransportError) -> String {
    let body = error.body.as_ref();
    server_field(body, "message")
        .or_else(|| server_field(body, "detail"))
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

fn server_field(body: Option<&Value>, field: &str) -> Option<String> {
    body?
        .get(field)?
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
