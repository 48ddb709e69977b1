//! Caption request validation
//!
//! Checks the inbound JSON body and collects every violation in one pass

use crate::config::settings::ValidationConfig;
use crate::models::caption::is_debug_requested;
use crate::models::ValidationResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Base64 alphabet with up to two trailing padding characters
static BASE64_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").unwrap());

pub const NOT_AN_OBJECT: &str = "Request body must be a valid JSON object";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Remove all whitespace from a base64 payload
pub fn clean_base64(data: &str) -> String {
    data.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Decoded byte size estimate for a cleaned base64 string
pub fn estimated_decoded_size(cleaned: &str) -> usize {
    cleaned.len() * 3 / 4
}

/// Request validator
#[derive(Debug, Clone)]
pub struct RequestValidator {
    config: ValidationConfig,
    allow_debug_mode: bool,
}

impl RequestValidator {
    pub fn new(config: ValidationConfig, allow_debug_mode: bool) -> Self {
        Self { config, allow_debug_mode }
    }

    /// Validate a parsed request body
    ///
    /// `None` means the body was absent or not JSON at all.
    pub fn validate(&self, body: Option<&Value>) -> ValidationResult {
        let fields = match body.and_then(Value::as_object) {
            Some(fields) => fields,
            None => return ValidationResult::from_errors(vec![NOT_AN_OBJECT.to_string()]),
        };

        if body.map(is_debug_requested).unwrap_or(false) {
            if self.allow_debug_mode {
                warn!("debugMode requested by client, skipping request validation");
                return ValidationResult::valid();
            }
            warn!("debugMode requested by client but disabled by server configuration");
        }

        let mut errors = Vec::new();

        let image_data = required_string(fields, "imageData", &mut errors);
        let mime_type = required_string(fields, "mimeType", &mut errors);

        if let Some(image_data) = image_data {
            self.check_image_data(image_data, &mut errors);
        }

        if let Some(mime_type) = mime_type {
            self.check_mime_type(mime_type, &mut errors);
        }

        debug!("Validation finished with {} error(s)", errors.len());
        ValidationResult::from_errors(errors)
    }

    fn check_image_data(&self, image_data: &str, errors: &mut Vec<String>) {
        let cleaned = clean_base64(image_data);

        if !BASE64_PATTERN.is_match(&cleaned) {
            errors.push("imageData is not valid base64: contains characters outside the base64 alphabet".to_string());
        }

        let estimated = estimated_decoded_size(&cleaned);
        if estimated > self.config.max_image_bytes {
            errors.push(format!(
                "Image size exceeded: {:.2}MB is larger than the maximum of {:.2}MB",
                estimated as f64 / BYTES_PER_MB,
                self.config.max_image_bytes as f64 / BYTES_PER_MB
            ));
        } else if estimated < self.config.min_image_bytes {
            errors.push(format!(
                "Image data is too small or invalid ({} bytes, minimum {} bytes)",
                estimated, self.config.min_image_bytes
            ));
        }

        if cleaned.is_empty() || cleaned.len() % 4 != 0 {
            errors.push("imageData is not valid base64: length must be a non-zero multiple of 4".to_string());
        }
    }

    fn check_mime_type(&self, mime_type: &str, errors: &mut Vec<String>) {
        if !self.config.allowed_mime_types.iter().any(|allowed| allowed == mime_type) {
            errors.push(format!(
                "Unsupported mimeType '{}'. Allowed types: {}",
                mime_type,
                self.config.allowed_mime_types.join(", ")
            ));
        }
    }
}

/// Fetch a required, non-empty string field, recording an error otherwise
fn required_string<'a>(fields: &'a Map<String, Value>, key: &str, errors: &mut Vec<String>) -> Option<&'a str> {
    match fields.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            errors.push(format!("{} is required", key));
            None
        }
        Some(_) => {
            errors.push(format!("{} must be a string", key));
            None
        }
    }
}
