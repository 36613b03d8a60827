//! Acknowledgments written back to producers.

use serde::{Deserialize, Serialize};

/// Typed error codes carried in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidCommand,
    InvalidParams,
    QueueFull,
    /// `stop_animation` with nothing running. Informational; the response
    /// still reports success.
    NotRunning,
    HardwareUnavailable,
}

/// One response per request, newline-delimited JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: Option<ErrorCode>,
}

impl Response {
    /// Successful acknowledgment.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    /// Success with an informational code (e.g. [`ErrorCode::NotRunning`]).
    pub fn ok_with_code(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: Some(code),
        }
    }

    /// Rejection with a typed code.
    pub fn rejected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(code),
        }
    }

    /// Serialize as one protocol line, newline included.
    pub fn to_line(&self) -> String {
        // Response serialization cannot fail: no maps, no non-string keys.
        let mut line = serde_json::to_string(self).unwrap_or_else(|_| {
            "{\"success\":false,\"message\":\"serialization failure\",\"error\":null}".to_owned()
        });
        line.push('\n');
        line
    }
}
