//! Data model unit tests

use captionproxy::models::anthropic::*;
use captionproxy::models::openai::*;
use captionproxy::models::{CaptionRequest, CaptionResponse, Confidence, ProviderResult, TokenUsage, ValidationResult};
use serde_json::json;

fn sample_result(usage: Option<TokenUsage>) -> ProviderResult {
    ProviderResult {
        caption: "A golden retriever catching a frisbee in a park.".to_string(),
        provider: "openai".to_string(),
        model: "gpt-4o".to_string(),
        confidence: Confidence::High,
        usage,
    }
}

#[test]
fn test_caption_request_from_value() {
    let request = CaptionRequest::from_value(&json!({
        "imageData": "QUJD",
        "mimeType": "image/png",
        "debugMode": true,
        "extra": "ignored"
    }));

    assert_eq!(request.image_data, "QUJD");
    assert_eq!(request.mime_type, "image/png");
    assert!(request.debug_mode);

    let request = CaptionRequest::from_value(&json!({"imageData": 12}));
    assert_eq!(request, CaptionRequest::default());
}

#[test]
fn test_caption_response_serialization() {
    let request = CaptionRequest {
        image_data: "QUJD\nREVG".to_string(),
        mime_type: "image/jpeg".to_string(),
        debug_mode: false,
    };
    let usage = TokenUsage {
        prompt_tokens: 765,
        completion_tokens: 12,
        total_tokens: 777,
    };

    let response = CaptionResponse::new(
        sample_result(Some(usage)),
        &request,
        "req_1700000000000_0123456789abcdef0123456789abcdef",
        1234,
        "2024-01-01T00:00:00.000Z".to_string(),
    );

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(
        value,
        json!({
            "success": true,
            "data": {
                "caption": "A golden retriever catching a frisbee in a park.",
                "provider": "openai",
                "model": "gpt-4o",
                "confidence": "high",
                "usage": {"prompt_tokens": 765, "completion_tokens": 12, "total_tokens": 777},
                "processingTime": "1234ms",
                "requestId": "req_1700000000000_0123456789abcdef0123456789abcdef"
            },
            "metadata": {
                "timestamp": "2024-01-01T00:00:00.000Z",
                "provider": "openai",
                "requestId": "req_1700000000000_0123456789abcdef0123456789abcdef",
                "processingTime": 1234,
                "imageSize": 9,
                "mimeType": "image/jpeg"
            }
        })
    );
}

#[test]
fn test_image_size_counts_characters() {
    // Unicode whitespace is stripped by validation but still part of the raw string
    let request = CaptionRequest {
        image_data: "QUJD\u{a0}REVG\u{2028}".to_string(),
        mime_type: "image/png".to_string(),
        debug_mode: false,
    };

    let response = CaptionResponse::new(
        sample_result(None),
        &request,
        "req_1_00000000000000000000000000000000",
        5,
        "2024-01-01T00:00:00.000Z".to_string(),
    );

    assert_eq!(request.image_data.len(), 13);
    assert_eq!(response.metadata.image_size, 10);
}

#[test]
fn test_missing_usage_serializes_as_null() {
    let response = CaptionResponse::new(
        sample_result(None),
        &CaptionRequest::default(),
        "req_1_00000000000000000000000000000000",
        0,
        "2024-01-01T00:00:00.000Z".to_string(),
    );

    let value = serde_json::to_value(&response).unwrap();
    assert!(value["data"]["usage"].is_null());
    assert_eq!(value["data"]["processingTime"], "0ms");
    assert_eq!(value["metadata"]["imageSize"], 0);
}

#[test]
fn test_confidence_from_stop_reason() {
    assert_eq!(Confidence::from_stop_reason(Some("stop"), "stop"), Confidence::High);
    assert_eq!(Confidence::from_stop_reason(Some("length"), "stop"), Confidence::Medium);
    assert_eq!(Confidence::from_stop_reason(None, "end_turn"), Confidence::Medium);
    assert_eq!(serde_json::to_value(Confidence::Medium).unwrap(), json!("medium"));
}

#[test]
fn test_validation_result() {
    assert!(ValidationResult::valid().is_valid);
    assert!(ValidationResult::from_errors(vec![]).is_valid);

    let result = ValidationResult::from_errors(vec!["mimeType is required".to_string()]);
    assert!(!result.is_valid);
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"isValid": false, "errors": ["mimeType is required"]})
    );
}

#[test]
fn test_openai_vision_request_serialization() {
    let request = OpenAIRequest::vision("gpt-4o", "Describe", "data:image/png;base64,QUJD".to_string(), 300, 0.7);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["model"], "gpt-4o");
    assert_eq!(value["max_tokens"], 300);
    let content = &value["messages"][0]["content"];
    assert_eq!(value["messages"][0]["role"], "user");
    assert_eq!(content[0], json!({"type": "text", "text": "Describe"}));
    assert_eq!(content[1]["type"], "image_url");
    assert_eq!(content[1]["image_url"]["url"], "data:image/png;base64,QUJD");
}

#[test]
fn test_openai_response_deserialization() {
    let response: OpenAIResponse = serde_json::from_value(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": [{"type": "text", "text": "A boat."}]},
            "logprobs": null,
            "finish_reason": "stop"
        }],
        "system_fingerprint": "fp_1"
    }))
    .unwrap();

    assert_eq!(response.model.as_deref(), Some("gpt-4o-mini"));
    let content = response.choices[0].message.content.as_ref().unwrap();
    assert_eq!(content.extract_text(), "A boat.");
    assert!(response.usage.is_none());
}

#[test]
fn test_anthropic_vision_request_serialization() {
    let request = AnthropicRequest::vision("claude-3-5-sonnet-latest", "Describe", "image/webp", "QUJD".to_string(), 256, 0.5);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["max_tokens"], 256);
    let content = &value["messages"][0]["content"];
    assert_eq!(
        content[0],
        json!({"type": "image", "source": {"type": "base64", "media_type": "image/webp", "data": "QUJD"}})
    );
    assert_eq!(content[1], json!({"type": "text", "text": "Describe"}));
}

#[test]
fn test_anthropic_response_skips_unknown_blocks() {
    let response: AnthropicResponse = serde_json::from_value(json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "content": [
            {"type": "thinking", "thinking": "hmm", "signature": "sig"},
            {"type": "text", "text": "A snowy owl on a fence post."}
        ],
        "model": "claude-3-5-sonnet-20241022",
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 1200, "output_tokens": 14}
    }))
    .unwrap();

    assert_eq!(response.first_text(), Some("A snowy owl on a fence post."));
    assert_eq!(response.usage.as_ref().unwrap().output_tokens, 14);
}
