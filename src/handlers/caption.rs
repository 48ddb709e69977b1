//! Caption handlers
//!
//! `POST /generateCaption` runs authenticate -> validate -> caption -> respond.
//! Any failure along the way is returned as an `AppError` and rendered as the
//! error envelope.

use crate::handlers::AppState;
use crate::middleware::auth::AppToken;
use crate::models::{CaptionRequest, CaptionResponse};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::create_log_summary;
use crate::utils::{iso_timestamp, RequestId};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Handle caption requests
///
/// POST /generateCaption
///
/// Authentication happens in the [`AppToken`] extractor, before the body is read.
pub async fn generate_caption(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    _token: AppToken,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<CaptionResponse>> {
    let started = Instant::now();
    debug!("Request authenticated");

    let body = body.map_err(|rejection| {
        AppError::Validation(vec![format!("Failed to read request body: {}", rejection.body_text())])
    })?;

    let parsed: Option<Value> = serde_json::from_slice(&body).ok();

    if let Some(value) = &parsed {
        if let Ok(summary_json) = serde_json::to_string_pretty(&create_log_summary(value)) {
            debug!("📥 Client Request:\n{}", summary_json);
        }
    }

    let validation = state.validator.validate(parsed.as_ref());
    if !validation.is_valid {
        return Err(AppError::Validation(validation.errors));
    }

    let request = parsed
        .as_ref()
        .map(CaptionRequest::from_value)
        .unwrap_or_default();
    debug!("Request validated (mimeType: {}, imageData: {} chars)", request.mime_type, request.image_data.len());

    let result = state
        .provider
        .caption(&request.image_data, &request.mime_type)
        .await?;

    let processing_ms = started.elapsed().as_millis() as u64;
    info!(
        "Caption generated by {} ({}) in {}ms - confidence: {:?}",
        result.provider, result.model, processing_ms, result.confidence
    );

    Ok(Json(CaptionResponse::new(
        result,
        &request,
        request_id.as_str(),
        processing_ms,
        iso_timestamp(),
    )))
}

/// CORS preflight
///
/// OPTIONS /generateCaption returns an empty 200; the CORS headers are added by the router.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on the caption route
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method.to_string())
}
