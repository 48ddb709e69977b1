//! Logging utilities
//!
//! Builds log-safe summaries of request payloads. Base64 images are megabytes
//! long, so every long string is cut down before it reaches a log line.

use serde_json::Value;

/// Strings longer than this are truncated in log summaries
pub const MAX_LOGGED_STRING: usize = 64;

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    // Stay on a char boundary
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} chars truncated)", &s[..end], s.len() - end)
}

/// Copy of a JSON payload with every long string truncated
///
/// Keeps the original structure so the summary can be pretty-printed as-is.
pub fn create_log_summary(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(truncate_content(s, MAX_LOGGED_STRING)),
        Value::Array(items) => Value::Array(items.iter().map(create_log_summary).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), create_log_summary(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Log summary of any serializable payload
pub fn summarize<T: serde::Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload)
        .map(|v| create_log_summary(&v))
        .unwrap_or_else(|_| serde_json::json!({"error": "serialize failed"}))
}
