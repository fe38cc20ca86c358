//! The `{success, message}` envelope used by every error response.

use serde::{Deserialize, Serialize};

/// Error body - the only shape error responses ever carry.
///
/// Internal failure detail is logged server-side, never serialized here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
