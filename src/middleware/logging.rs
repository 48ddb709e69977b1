//! Logging middleware
//!
//! Allocates the request id and records HTTP request and response information

use crate::utils::RequestId;
use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn, Instrument};

/// Response header echoing the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests slower than this are flagged
const SLOW_REQUEST_SECS: u64 = 10;

/// Request logging middleware
///
/// Stores a fresh [`RequestId`] in the request extensions for handlers to use.
pub async fn request_logging_middleware(mut request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let request_id = RequestId::generate();
    let method = request.method().clone();
    let uri = request.uri().clone();

    // Create request span
    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
    );

    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let content_length = request
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    request.extensions_mut().insert(request_id.clone());

    async move {
        info!("Request started: {} {} - User-Agent: {}", method, uri, user_agent);

        if let Some(length) = content_length {
            info!("Request body size: {} bytes", length);
        }

        let mut response = next.run(request).await;

        let duration = start_time.elapsed();
        let status = response.status();
        let elapsed_ms = duration.as_secs_f64() * 1000.0;

        if status.is_success() {
            info!("Request completed: {} - Duration: {:.2}ms", status, elapsed_ms);
        } else if status.is_client_error() {
            warn!("Client error: {} - Duration: {:.2}ms", status, elapsed_ms);
        } else if status.is_server_error() {
            warn!("Server error: {} - Duration: {:.2}ms", status, elapsed_ms);
        } else {
            info!("Request response: {} - Duration: {:.2}ms", status, elapsed_ms);
        }

        if duration.as_secs() >= SLOW_REQUEST_SECS {
            warn!("Slow request detected: {} {} - Duration: {:.2}s", method, uri, duration.as_secs_f64());
        }

        if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        response
    }
    .instrument(span)
    .await
}
