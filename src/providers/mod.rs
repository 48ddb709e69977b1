//! Provider module
//!
//! Defines the caption provider trait and the upstream implementations.
//! The active provider is picked once at startup from `CAPTION_PROVIDER`.

pub mod anthropic;
pub mod openai;

use crate::config::{settings::ProviderSettings, ProviderKind};
use crate::models::ProviderResult;
use crate::utils::error::{AppError, AppResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAIProvider;

/// Instruction sent alongside every image
pub const CAPTION_PROMPT: &str = "Write a single descriptive caption for this image. \
Describe the main subject, the setting and any notable details in one or two sentences. \
Respond with the caption text only.";

/// Provider trait for upstream captioning APIs
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// Provider identifier reported to clients
    fn name(&self) -> &str;

    /// Configured model name
    fn model(&self) -> &str;

    /// Caption a base64 image
    async fn caption(&self, image_data: &str, mime_type: &str) -> AppResult<ProviderResult>;
}

/// Build the provider selected by configuration
pub fn build_provider(settings: &ProviderSettings) -> Result<Arc<dyn CaptionProvider>> {
    let client = build_http_client(settings.timeout)?;

    let provider: Arc<dyn CaptionProvider> = match settings.kind {
        ProviderKind::OpenAI => Arc::new(OpenAIProvider::new(client, settings.clone())),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(client, settings.clone())),
    };

    info!(
        "Caption provider initialized: {} (model: {}, timeout: {}s)",
        provider.name(),
        provider.model(),
        settings.timeout
    );

    Ok(provider)
}

/// HTTP client with the hard provider timeout applied to the whole exchange
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("captionproxy/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

/// Classify a transport-level failure
pub(crate) fn transport_error(err: reqwest::Error, timeout_secs: u64, label: &str) -> AppError {
    if err.is_timeout() {
        AppError::ProviderTimeout(timeout_secs)
    } else {
        AppError::ProviderUpstream(format!("{} API request failed: {}", label, err))
    }
}

/// Turn a non-success upstream response into a provider error
///
/// An unreadable error body is treated as an empty object.
pub(crate) async fn upstream_error(response: Response, label: &str) -> AppError {
    let status = response.status().as_u16();
    let body: Value = response
        .json()
        .await
        .unwrap_or_else(|_| serde_json::json!({}));

    match body.pointer("/error/message").and_then(Value::as_str) {
        Some(message) => AppError::ProviderUpstream(format!("{} API error: {} - {}", label, status, message)),
        None => AppError::ProviderUpstream(format!("{} API error: {}", label, status)),
    }
}
