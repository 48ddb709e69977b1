//! Caption API data models
//!
//! Client-facing request, validation and response envelope structures

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound caption request
///
/// Built from the raw JSON body after validation. Fields default to empty
/// strings so a debug-bypassed body with missing fields can still be forwarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequest {
    /// Base64 image payload, as sent by the client
    pub image_data: String,
    /// Declared image MIME type
    pub mime_type: String,
    /// Client-requested validation bypass
    #[serde(default)]
    pub debug_mode: bool,
}

impl CaptionRequest {
    /// Extract request fields from a JSON body
    pub fn from_value(body: &Value) -> Self {
        let text = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            image_data: text("imageData"),
            mime_type: text("mimeType"),
            debug_mode: is_debug_requested(body),
        }
    }
}

/// Whether the body carries `debugMode: true`
pub fn is_debug_requested(body: &Value) -> bool {
    body.get("debugMode").and_then(Value::as_bool).unwrap_or(false)
}

/// Outcome of request validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Every violation, in check order
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self { is_valid: errors.is_empty(), errors }
    }
}

/// Coarse caption confidence derived from the upstream stop reason
///
/// A heuristic label, not a calibrated probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    /// `High` when the upstream stopped normally, `Medium` otherwise
    pub fn from_stop_reason(reason: Option<&str>, normal: &str) -> Self {
        if reason == Some(normal) {
            Confidence::High
        } else {
            Confidence::Medium
        }
    }
}

/// Token accounting, normalized across providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Caption produced by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub caption: String,
    pub provider: String,
    pub model: String,
    pub confidence: Confidence,
    pub usage: Option<TokenUsage>,
}

/// Success envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionResponse {
    /// Always true
    pub success: bool,
    pub data: CaptionData,
    pub metadata: ResponseMetadata,
}

/// Success payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionData {
    pub caption: String,
    pub provider: String,
    pub model: String,
    pub confidence: Confidence,
    pub usage: Option<TokenUsage>,
    /// Elapsed time formatted as `"<n>ms"`
    pub processing_time: String,
    pub request_id: String,
}

/// Success metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub timestamp: String,
    pub provider: String,
    pub request_id: String,
    /// Elapsed time in milliseconds
    pub processing_time: u64,
    /// Length of the raw `imageData` string, in characters
    pub image_size: usize,
    pub mime_type: String,
}

impl CaptionResponse {
    /// Wrap a provider result into the success envelope
    pub fn new(
        result: ProviderResult,
        request: &CaptionRequest,
        request_id: &str,
        processing_ms: u64,
        timestamp: String,
    ) -> Self {
        let metadata = ResponseMetadata {
            timestamp,
            provider: result.provider.clone(),
            request_id: request_id.to_string(),
            processing_time: processing_ms,
            image_size: request.image_data.chars().count(),
            mime_type: request.mime_type.clone(),
        };

        Self {
            success: true,
            data: CaptionData {
                caption: result.caption,
                provider: result.provider,
                model: result.model,
                confidence: result.confidence,
                usage: result.usage,
                processing_time: format!("{}ms", processing_ms),
                request_id: request_id.to_string(),
            },
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_defaults_missing_fields() {
        let request = CaptionRequest::from_value(&json!({"debugMode": true, "imageData": ""}));

        assert_eq!(request.image_data, "");
        assert_eq!(request.mime_type, "");
        assert!(request.debug_mode);
    }

    #[test]
    fn test_debug_mode_requires_boolean_true() {
        assert!(!is_debug_requested(&json!({"debugMode": "true"})));
        assert!(!is_debug_requested(&json!({"debugMode": false})));
        assert!(is_debug_requested(&json!({"debugMode": true})));
    }

    #[test]
    fn test_confidence_from_stop_reason() {
        assert_eq!(Confidence::from_stop_reason(Some("stop"), "stop"), Confidence::High);
        assert_eq!(Confidence::from_stop_reason(Some("length"), "stop"), Confidence::Medium);
        assert_eq!(Confidence::from_stop_reason(None, "stop"), Confidence::Medium);
    }
}
