//! Request identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier attached to every request
///
/// Format: `req_<unix-millis>_<uuid-v4-simple>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Allocate a fresh identifier
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        Self(format!("req_{}_{}", millis, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
