use reqwest::StatusCode;
use serde_json::Value;

/// Extracts a human-readable error from a Blockonomics error body. Blockonomics usually replies with
/// `{"message": "..."}`, but not always, so fall back to the raw body.
pub fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// The canonical reason phrase for an HTTP status, e.g. "Unauthorized" for 401.
pub fn reason_phrase(status: u16) -> String {
    StatusCode::from_u16(status).ok().and_then(|s| s.canonical_reason()).unwrap_or("Unknown").to_string()
}

/// The push channel URL for a single payment address.
pub fn push_channel_url(base: &str, address: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), address)
}
