//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic and router construction

pub mod caption;
pub mod health;

use crate::config::Settings;
use crate::middleware::logging::request_logging_middleware;
use crate::providers::{build_provider, CaptionProvider};
use crate::services::RequestValidator;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Caption endpoint path
pub const CAPTION_PATH: &str = "/generateCaption";

/// Application state
///
/// Immutable after startup and shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub validator: RequestValidator,
    pub provider: Arc<dyn CaptionProvider>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings, provider: Arc<dyn CaptionProvider>) -> Self {
        let validator = RequestValidator::new(
            settings.validation.clone(),
            settings.security.allow_debug_mode,
        );

        Self {
            settings,
            validator,
            provider,
            started_at: Instant::now(),
        }
    }
}

/// Create application router using the provider named in the settings
pub async fn create_router(settings: Settings) -> Result<Router> {
    let provider = build_provider(&settings.provider)?;
    Ok(create_router_with_provider(settings, provider))
}

/// Create application router around an explicit provider
pub fn create_router_with_provider(settings: Settings, provider: Arc<dyn CaptionProvider>) -> Router {
    let max_request_size = settings.request.max_request_size;
    let app_state = Arc::new(AppState::new(settings, provider));

    // CORS headers go on every response, errors included
    let cors_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization, X-App-Token"),
        ));

    // Create middleware stack
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_headers)
        .layer(axum::middleware::from_fn(request_logging_middleware));

    Router::new()
        .route(
            CAPTION_PATH,
            post(caption::generate_caption)
                .options(caption::preflight)
                .fallback(caption::method_not_allowed),
        )
        .route("/health", get(health::health_check))
        .layer(DefaultBodyLimit::max(max_request_size))
        .with_state(app_state)
        .layer(middleware_stack)
}
