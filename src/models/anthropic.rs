//! Anthropic Messages API data models

use serde::{Deserialize, Serialize};

/// Messages API request structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicRequest {
    /// Model name
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Message list
    pub messages: Vec<AnthropicMessage>,
    /// Temperature parameter (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Anthropic message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role (user/assistant)
    pub role: String,
    /// Structured content blocks
    pub content: Vec<AnthropicContentBlock>,
}

/// Anthropic content block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnthropicContentBlock {
    /// Text block
    #[serde(rename = "text")]
    Text { text: String },
    /// Image block
    #[serde(rename = "image")]
    Image { source: AnthropicImageSource },
    /// Any block type we do not read (tool use, thinking, ...)
    #[serde(other)]
    Other,
}

/// Anthropic image source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicImageSource {
    /// Source type (base64)
    #[serde(rename = "type")]
    pub source_type: String,
    /// Media type
    pub media_type: String,
    /// Image data
    pub data: String,
}

/// Messages API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicResponse {
    /// Response ID
    #[serde(default)]
    pub id: Option<String>,
    /// Response content
    #[serde(default)]
    pub content: Vec<AnthropicContentBlock>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Stop reason
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Usage statistics
    #[serde(default)]
    pub usage: Option<AnthropicUsage>,
}

/// Anthropic usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicUsage {
    /// Input token count
    #[serde(default)]
    pub input_tokens: u32,
    /// Output token count
    #[serde(default)]
    pub output_tokens: u32,
}

impl AnthropicRequest {
    /// Build a single-turn vision request: one base64 image followed by the prompt
    pub fn vision(model: &str, prompt: &str, media_type: &str, data: String, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.to_string(),
            max_tokens,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: vec![
                    AnthropicContentBlock::Image {
                        source: AnthropicImageSource {
                            source_type: "base64".to_string(),
                            media_type: media_type.to_string(),
                            data,
                        },
                    },
                    AnthropicContentBlock::Text { text: prompt.to_string() },
                ],
            }],
            temperature: Some(temperature),
        }
    }
}

impl AnthropicResponse {
    /// Text of the first text block, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_skips_other_blocks() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{"content":[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"A dog"}],"stop_reason":"end_turn"}"#,
        )
        .unwrap();

        assert_eq!(response.first_text(), Some("A dog"));
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_vision_request_places_image_first() {
        let request = AnthropicRequest::vision("claude", "Describe", "image/png", "AAAA".to_string(), 300, 0.7);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["messages"][0]["content"][0]["type"], "image");
        assert_eq!(json["messages"][0]["content"][0]["source"]["type"], "base64");
        assert_eq!(json["messages"][0]["content"][0]["source"]["media_type"], "image/png");
        assert_eq!(json["messages"][0]["content"][1]["text"], "Describe");
    }
}
