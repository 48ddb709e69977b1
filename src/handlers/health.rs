//! Health check handlers
//!
//! Provides application health status check endpoints

use crate::handlers::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Active caption provider
    pub provider: String,
    /// Active model
    pub model: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Liveness check
///
/// GET /health
/// Does not call the upstream provider.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: crate::utils::iso_timestamp(),
        provider: state.provider.name().to_string(),
        model: state.provider.model().to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
