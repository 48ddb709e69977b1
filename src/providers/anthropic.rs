//! Anthropic Provider implementation
//!
//! Messages API with base64 image content blocks

use super::{transport_error, upstream_error, CaptionProvider, CAPTION_PROMPT};
use crate::config::settings::ProviderSettings;
use crate::models::anthropic::*;
use crate::models::{Confidence, ProviderResult, TokenUsage};
use crate::services::validator::clean_base64;
use crate::utils::error::{AppError, AppResult, ErrorContext};
use crate::utils::logging::summarize;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const API_VERSION: &str = "2023-06-01";

/// Stop reason of a message that ended normally
const NORMAL_STOP: &str = "end_turn";

/// Anthropic Provider
pub struct AnthropicProvider {
    client: Client,
    settings: ProviderSettings,
}

/// The Messages API only knows `image/jpeg`
fn media_type(mime_type: &str) -> &str {
    match mime_type {
        "image/jpg" => "image/jpeg",
        other => other,
    }
}

impl AnthropicProvider {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn build_url(&self) -> String {
        let base_url = self.settings.base_url.trim_end_matches('/');
        format!("{}/messages", base_url)
    }

    pub fn build_request(&self, image_data: &str, mime_type: &str) -> AnthropicRequest {
        AnthropicRequest::vision(
            &self.settings.model,
            CAPTION_PROMPT,
            media_type(mime_type),
            clean_base64(image_data),
            self.settings.max_tokens,
            self.settings.temperature,
        )
    }

    fn into_result(&self, response: AnthropicResponse) -> AppResult<ProviderResult> {
        let caption = response
            .first_text()
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if caption.is_empty() {
            return Err(AppError::NoCaption);
        }

        Ok(ProviderResult {
            caption,
            provider: self.name().to_string(),
            model: response.model.clone().unwrap_or_else(|| self.settings.model.clone()),
            confidence: Confidence::from_stop_reason(response.stop_reason.as_deref(), NORMAL_STOP),
            usage: response.usage.as_ref().map(|usage| TokenUsage {
                prompt_tokens: usage.input_tokens,
                completion_tokens: usage.output_tokens,
                total_tokens: usage.input_tokens + usage.output_tokens,
            }),
        })
    }
}

#[async_trait]
impl CaptionProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn caption(&self, image_data: &str, mime_type: &str) -> AppResult<ProviderResult> {
        let request = self.build_request(image_data, mime_type);

        if let Ok(summary_json) = serde_json::to_string_pretty(&summarize(&request)) {
            debug!("🔄 Anthropic Request:\n{}", summary_json);
        }

        let timeout = self.settings.timeout;
        let response = self.client
            .post(self.build_url())
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout, "Anthropic"))?;

        if !response.status().is_success() {
            return Err(upstream_error(response, "Anthropic").await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout, "Anthropic"))?;

        let anthropic_response: AnthropicResponse = serde_json::from_slice(&body)
            .internal_context("Failed to parse Anthropic response")?;

        debug!("Anthropic request completed successfully");
        self.into_result(anthropic_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(
            Client::new(),
            ProviderSettings {
                kind: ProviderKind::Anthropic,
                api_key: "sk-ant-test".to_string(),
                base_url: "https://api.anthropic.com/v1".to_string(),
                model: "claude-3-5-sonnet-latest".to_string(),
                max_tokens: 300,
                temperature: 0.7,
                timeout: 30,
            },
        )
    }

    #[test]
    fn test_jpg_normalized_to_jpeg() {
        let request = provider().build_request("QUJD", "image/jpg");
        match &request.messages[0].content[0] {
            AnthropicContentBlock::Image { source } => assert_eq!(source.media_type, "image/jpeg"),
            other => panic!("Expected image block, got {:?}", other),
        }
    }

    #[test]
    fn test_usage_is_summed() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"A lighthouse at dusk."}],"stop_reason":"end_turn","usage":{"input_tokens":1200,"output_tokens":9}}"#,
        )
        .unwrap();

        let result = provider().into_result(response).unwrap();
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.model, "claude-3-5-sonnet-latest");
        assert_eq!(
            result.usage,
            Some(TokenUsage { prompt_tokens: 1200, completion_tokens: 9, total_tokens: 1209 })
        );
    }

    #[test]
    fn test_whitespace_only_text_is_no_caption() {
        let response: AnthropicResponse =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"   "}],"stop_reason":"end_turn"}"#).unwrap();
        assert!(matches!(provider().into_result(response), Err(AppError::NoCaption)));
    }
}
