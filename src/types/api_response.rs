use serde::{Deserialize, Serialize};

use crate::events::{ErrorType, LogEntry};

const SUCCESS_MESSAGE: &str = "Success";
const FALLBACK_MESSAGE: &str = "Unexpected error";

/// JSON envelope returned by `GET /events/log`.
///
/// `result` is `null` on failure and `errorType` is empty on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub is_success: bool,
    pub result: Option<Vec<LogEntry>>,
    pub message: String,
    pub error_type: String,
}

impl ApiResponse {
    pub fn success(entries: Vec<LogEntry>) -> Self {
        Self {
            is_success: true,
            result: Some(entries),
            message: SUCCESS_MESSAGE.to_string(),
            error_type: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>, error_type: ErrorType) -> Self {
        let message = message.into();
        Self {
            is_success: false,
            result: None,
            message: if message.is_empty() {
                FALLBACK_MESSAGE.to_string()
            } else {
                message
            },
            error_type: error_type.to_string(),
        }
    }

    /// Number of entries carried by a successful response.
    pub fn count(&self) -> usize {
        self.result.as_ref().map_or(0, Vec::len)
    }
}
