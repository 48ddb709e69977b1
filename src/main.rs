//! Caption Proxy Server
//!
//! HTTP service that captions base64 images through a vision-capable LLM API

use anyhow::{Context, Result};
use captionproxy::config::settings::LoggingConfig;
use captionproxy::{create_router, version_info, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Settings first: the log level and format live there
    let settings = Settings::new().context("Failed to load server settings")?;

    // Initialize logging
    init_logging(&settings.logging)?;
    info!("{}", version_info());
    info!(
        "Server settings loaded (provider: {}, debug bypass allowed: {})",
        settings.provider.kind, settings.security.allow_debug_mode
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Create router
    let app = create_router(settings).await?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Caption proxy server started!");
    info!("📝 Health check: http://{}/health", addr);
    info!("🖼️ Caption endpoint: http://{}/generateCaption", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}

/// Initialize logging system
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if logging.format == "json" {
        // JSON format logs (production environment)
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(logging.level.as_str())
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .finish())
    } else {
        // Human readable format (development environment)
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(logging.level.as_str())
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish())
    };

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Logging system initialized");
    Ok(())
}
