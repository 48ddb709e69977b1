//! OpenAI Provider implementation
//!
//! Standard OpenAI-compatible chat completions API with inline data-URI images

use super::{transport_error, upstream_error, CaptionProvider, CAPTION_PROMPT};
use crate::config::settings::ProviderSettings;
use crate::models::openai::*;
use crate::models::{Confidence, ProviderResult, TokenUsage};
use crate::services::validator::clean_base64;
use crate::utils::error::{AppError, AppResult, ErrorContext};
use crate::utils::logging::summarize;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Finish reason of a completion that ended normally
const NORMAL_STOP: &str = "stop";

/// OpenAI Provider
pub struct OpenAIProvider {
    client: Client,
    settings: ProviderSettings,
}

impl OpenAIProvider {
    pub fn new(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    /// Build the request URL
    fn build_url(&self) -> String {
        let base_url = self.settings.base_url.trim_end_matches('/');
        format!("{}/chat/completions", base_url)
    }

    /// Build the chat completion payload for one image
    pub fn build_request(&self, image_data: &str, mime_type: &str) -> OpenAIRequest {
        let data_uri = format!("data:{};base64,{}", mime_type, clean_base64(image_data));
        OpenAIRequest::vision(
            &self.settings.model,
            CAPTION_PROMPT,
            data_uri,
            self.settings.max_tokens,
            self.settings.temperature,
        )
    }

    /// Map a completion into a provider result
    fn into_result(&self, response: OpenAIResponse) -> AppResult<ProviderResult> {
        let choice = response.choices.first().ok_or(AppError::NoCaption)?;

        let caption = choice
            .message
            .content
            .as_ref()
            .map(|content| content.extract_text().trim().to_string())
            .unwrap_or_default();

        if caption.is_empty() {
            return Err(AppError::NoCaption);
        }

        Ok(ProviderResult {
            caption,
            provider: self.name().to_string(),
            model: response.model.clone().unwrap_or_else(|| self.settings.model.clone()),
            confidence: Confidence::from_stop_reason(choice.finish_reason.as_deref(), NORMAL_STOP),
            usage: response.usage.as_ref().map(|usage| TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
        })
    }
}

#[async_trait]
impl CaptionProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn caption(&self, image_data: &str, mime_type: &str) -> AppResult<ProviderResult> {
        let request = self.build_request(image_data, mime_type);

        if let Ok(summary_json) = serde_json::to_string_pretty(&summarize(&request)) {
            debug!("🔄 OpenAI Request:\n{}", summary_json);
        }

        let timeout = self.settings.timeout;
        let response = self.client
            .post(self.build_url())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout, "OpenAI"))?;

        if !response.status().is_success() {
            return Err(upstream_error(response, "OpenAI").await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout, "OpenAI"))?;

        let openai_response: OpenAIResponse = serde_json::from_slice(&body)
            .internal_context("Failed to parse OpenAI response")?;

        debug!("OpenAI request completed successfully");
        self.into_result(openai_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn provider() -> OpenAIProvider {
        OpenAIProvider::new(
            Client::new(),
            ProviderSettings {
                kind: ProviderKind::OpenAI,
                api_key: "sk-test".to_string(),
                base_url: "https://api.openai.com/v1/".to_string(),
                model: "gpt-4o".to_string(),
                max_tokens: 300,
                temperature: 0.7,
                timeout: 30,
            },
        )
    }

    #[test]
    fn test_build_url_trims_trailing_slash() {
        assert_eq!(provider().build_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_build_request_recleans_image() {
        let request = provider().build_request("QUJD\n REVG", "image/png");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["messages"][0]["content"][1]["image_url"]["url"], "data:image/png;base64,QUJDREVG");
        assert_eq!(json["messages"][0]["content"][0]["text"], CAPTION_PROMPT);
    }

    #[test]
    fn test_length_finish_reason_is_medium_confidence() {
        let response: OpenAIResponse = serde_json::from_str(
            r#"{"model":"gpt-4o-2024","choices":[{"message":{"role":"assistant","content":"  A red bicycle.  "},"finish_reason":"length"}]}"#,
        )
        .unwrap();

        let result = provider().into_result(response).unwrap();
        assert_eq!(result.caption, "A red bicycle.");
        assert_eq!(result.model, "gpt-4o-2024");
        assert_eq!(result.confidence, Confidence::Medium);
        assert!(result.usage.is_none());
    }

    #[test]
    fn test_empty_choices_is_no_caption() {
        let response: OpenAIResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(provider().into_result(response), Err(AppError::NoCaption)));
    }
}
