//! Authentication
//!
//! Validates the shared app token presented by clients

use crate::handlers::AppState;
use crate::utils::error::AppError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// Header carrying the app token
pub const APP_TOKEN_HEADER: &str = "x-app-token";

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$").unwrap()
});

/// Whether a token has the canonical `8-4-4-4-12` hex UUID shape
pub fn is_uuid_shaped(token: &str) -> bool {
    UUID_PATTERN.is_match(token)
}

/// Check a candidate token against the configured secret
///
/// Fails closed: absent or malformed tokens are rejected.
pub fn validate_app_token(candidate: Option<&str>, expected: &str) -> bool {
    match candidate {
        Some(token) => is_uuid_shaped(token) && token == expected,
        None => false,
    }
}

/// Pull the token from `X-App-Token`, falling back to `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let app_token = headers
        .get(APP_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if app_token.is_some() {
        return app_token;
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Proof that the request carried a valid app token
///
/// Used as a handler argument; rejection is an `AUTH_001` error.
#[derive(Debug, Clone, Copy)]
pub struct AppToken;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AppToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers);

        if validate_app_token(token, &state.settings.auth.app_token) {
            debug!("Authentication successful");
            return Ok(AppToken);
        }

        let reason = match token {
            None => "missing app token",
            Some(t) if !is_uuid_shaped(t) => "malformed app token",
            Some(_) => "app token mismatch",
        };
        Err(AppError::Authentication(reason.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "123e4567-e89b-12d3-a456-426614174000";

    #[test]
    fn test_uuid_shape() {
        assert!(is_uuid_shaped(TOKEN));
        assert!(is_uuid_shaped("123E4567-E89B-12D3-A456-426614174000"));
        assert!(!is_uuid_shaped("123e4567e89b12d3a456426614174000"));
        assert!(!is_uuid_shaped("123e4567-e89b-12d3-a456-42661417400g"));
        assert!(!is_uuid_shaped(""));
    }

    #[test]
    fn test_validate_app_token() {
        assert!(validate_app_token(Some(TOKEN), TOKEN));
        assert!(!validate_app_token(None, TOKEN));
        assert!(!validate_app_token(Some("123E4567-E89B-12D3-A456-426614174000"), TOKEN));
        assert!(!validate_app_token(Some("not-a-uuid"), "not-a-uuid"));
    }

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(AUTHORIZATION, format!("Bearer {}", TOKEN).parse().unwrap());
        assert_eq!(extract_token(&headers), Some(TOKEN));

        headers.insert(APP_TOKEN_HEADER, "00000000-0000-0000-0000-000000000000".parse().unwrap());
        assert_eq!(extract_token(&headers), Some("00000000-0000-0000-0000-000000000000"));
    }
}
