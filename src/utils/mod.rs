//! Utilities module
//!
//! Contains error handling, request identifiers and logging helpers

pub mod error;
pub mod logging;
pub mod request_id;

pub use request_id::RequestId;

/// Current UTC time as ISO-8601 with millisecond precision
pub fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
