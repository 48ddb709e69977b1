//! OpenAI API data models
//!
//! Chat completion request and response structures used for vision captioning

use serde::{Deserialize, Serialize};

/// OpenAI chat completion request structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIRequest {
    /// Model name
    pub model: String,
    /// Message list
    pub messages: Vec<OpenAIMessage>,
    /// Maximum tokens to generate (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Temperature parameter (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// OpenAI message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role (system/user/assistant)
    pub role: String,
    /// Message content
    #[serde(default)]
    pub content: Option<OpenAIContent>,
}

/// OpenAI message content (can be string or content array)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpenAIContent {
    /// Simple text content
    Text(String),
    /// Content array (supports multimodal)
    Array(Vec<OpenAIContentPart>),
}

/// OpenAI content part
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OpenAIContentPart {
    /// Text part
    #[serde(rename = "text")]
    Text { text: String },
    /// Image URL part
    #[serde(rename = "image_url")]
    ImageUrl { image_url: OpenAIImageUrl },
}

/// OpenAI image URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIImageUrl {
    /// Image URL (a `data:` URI for inline images)
    pub url: String,
    /// Detail level (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// OpenAI API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIResponse {
    /// Response ID
    #[serde(default)]
    pub id: Option<String>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Choice list
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    /// Usage statistics
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

/// OpenAI choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Message content
    pub message: OpenAIMessage,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// OpenAI usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIUsage {
    /// Prompt token count
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Completion token count
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total token count
    #[serde(default)]
    pub total_tokens: u32,
}

impl OpenAIRequest {
    /// Build a single-turn vision request: prompt text plus one inline image
    pub fn vision(model: &str, prompt: &str, data_uri: String, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: Some(OpenAIContent::Array(vec![
                    OpenAIContentPart::Text { text: prompt.to_string() },
                    OpenAIContentPart::ImageUrl {
                        image_url: OpenAIImageUrl { url: data_uri, detail: None },
                    },
                ])),
            }],
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        }
    }
}

impl OpenAIContent {
    /// Extract text content
    pub fn extract_text(&self) -> String {
        match self {
            OpenAIContent::Text(text) => text.clone(),
            OpenAIContent::Array(parts) => {
                parts
                    .iter()
                    .filter_map(|part| match part {
                        OpenAIContentPart::Text { text } => Some(text.clone()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vision_request_shape() {
        let request = OpenAIRequest::vision("gpt-4o", "Describe", "data:image/png;base64,AAAA".to_string(), 300, 0.7);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(json["messages"][0]["content"][1]["image_url"]["url"], "data:image/png;base64,AAAA");
        assert!(json["messages"][0]["content"][1]["image_url"].get("detail").is_none());
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"A cat"}}]}"#,
        )
        .unwrap();

        assert!(response.usage.is_none());
        assert_eq!(response.choices[0].finish_reason, None);
        assert_eq!(response.choices[0].message.content.as_ref().unwrap().extract_text(), "A cat");
    }
}
