//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use crate::middleware::auth::is_uuid_shaped;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Captioning provider configuration
    pub provider: ProviderSettings,
    /// Client authentication configuration
    pub auth: AuthConfig,
    /// Image validation limits
    pub validation: ValidationConfig,
    /// Request configuration
    pub request: RequestConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Supported captioning providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible chat completions API
    OpenAI,
    /// Anthropic messages API
    Anthropic,
}

impl ProviderKind {
    /// Identifier used in configuration and responses
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4o",
            ProviderKind::Anthropic => "claude-3-5-sonnet-latest",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            other => anyhow::bail!("Unknown caption provider: {}", other),
        }
    }
}

/// Captioning provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Which provider implementation to dispatch to
    pub kind: ProviderKind,
    /// API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Vision-capable model name
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout: u64,
}

/// Client authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret clients must present (UUID shaped)
    pub app_token: String,
}

/// Image validation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum estimated decoded image size in bytes
    pub max_image_bytes: usize,
    /// Minimum estimated decoded image size in bytes
    pub min_image_bytes: usize,
    /// Accepted MIME types
    pub allowed_mime_types: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 20 * 1024 * 1024,
            min_image_bytes: 100,
            allowed_mime_types: ["image/jpeg", "image/jpg", "image/png", "image/webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Maximum request body size in bytes
    pub max_request_size: usize,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Whether a client-supplied `debugMode: true` may skip validation
    pub allow_debug_mode: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from the process environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    ///
    /// `new()` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        let kind: ProviderKind = get_or_default("CAPTION_PROVIDER", "openai")
            .parse()
            .context("Invalid CAPTION_PROVIDER value")?;

        let validation_defaults = ValidationConfig::default();

        let settings = Self {
            server: ServerConfig {
                host: get_or_default("SERVER_HOST", "0.0.0.0"),
                port: get_or_default("SERVER_PORT", "8080")
                    .parse()
                    .context("Invalid port number")?,
            },
            provider: ProviderSettings {
                kind,
                api_key: lookup(kind.api_key_env())
                    .with_context(|| format!("{} environment variable not set", kind.api_key_env()))?,
                base_url: get_or_default("PROVIDER_BASE_URL", kind.default_base_url()),
                model: get_or_default("PROVIDER_MODEL", kind.default_model()),
                max_tokens: get_or_default("PROVIDER_MAX_TOKENS", "300")
                    .parse()
                    .context("Invalid max tokens value")?,
                temperature: get_or_default("PROVIDER_TEMPERATURE", "0.7")
                    .parse()
                    .context("Invalid temperature value")?,
                timeout: get_or_default("REQUEST_TIMEOUT", "30")
                    .parse()
                    .context("Invalid timeout value")?,
            },
            auth: AuthConfig {
                app_token: lookup("APP_TOKEN")
                    .context("APP_TOKEN environment variable not set")?,
            },
            validation: ValidationConfig {
                max_image_bytes: get_or_default("MAX_IMAGE_BYTES", &validation_defaults.max_image_bytes.to_string())
                    .parse()
                    .context("Invalid maximum image size")?,
                min_image_bytes: get_or_default("MIN_IMAGE_BYTES", &validation_defaults.min_image_bytes.to_string())
                    .parse()
                    .context("Invalid minimum image size")?,
                allowed_mime_types: validation_defaults.allowed_mime_types,
            },
            request: RequestConfig {
                max_request_size: get_or_default("MAX_REQUEST_SIZE", "33554432")
                    .parse()
                    .context("Invalid maximum request size")?,
            },
            security: SecurityConfig {
                allow_debug_mode: get_or_default("ALLOW_DEBUG_MODE", "false")
                    .parse()
                    .context("Invalid debug mode flag")?,
            },
            logging: LoggingConfig {
                level: get_or_default("RUST_LOG", "info"),
                format: get_or_default("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        // Validate port range
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if !is_uuid_shaped(&self.auth.app_token) {
            anyhow::bail!("APP_TOKEN must be a UUID (xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx)");
        }

        if self.provider.api_key.is_empty() {
            anyhow::bail!("{} API key cannot be empty", self.provider.kind);
        }

        if self.provider.api_key.contains(char::is_whitespace) {
            anyhow::bail!("{} API key cannot contain whitespace characters", self.provider.kind);
        }

        // Validate URL format
        if !self.provider.base_url.starts_with("http") {
            anyhow::bail!("Invalid provider base URL format, should start with 'http'");
        }

        if self.provider.model.trim().is_empty() {
            anyhow::bail!("Provider model cannot be empty");
        }

        if self.provider.max_tokens == 0 {
            anyhow::bail!("Provider max tokens cannot be 0");
        }

        if self.provider.timeout == 0 {
            anyhow::bail!("Timeout values cannot be 0");
        }

        if self.validation.min_image_bytes >= self.validation.max_image_bytes {
            anyhow::bail!("Minimum image size must be below maximum image size");
        }

        // Validate request size limit
        if self.request.max_request_size == 0 {
            anyhow::bail!("Maximum request size cannot be 0");
        }

        // Validate log filter (a bare level or full directives such as `captionproxy=debug,tower_http=info`)
        EnvFilter::try_new(&self.logging.level)
            .with_context(|| format!("Invalid log level: {}", self.logging.level))?;

        // Validate log format
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}
