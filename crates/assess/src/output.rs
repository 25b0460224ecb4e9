//! JSON output helpers.

use std::fmt;

use serde::Serialize;

use crate::error::AssessError;

/// Structured error body: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl ErrorPayload {
    /// Payload carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Payload carrying the display text of `err`.
    pub fn from_error(err: &dyn fmt::Display) -> Self {
        Self::new(err.to_string())
    }
}

/// Serialize any result to a pretty-printed JSON string.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AssessError> {
    serde_json::to_string_pretty(value).map_err(|e| AssessError::Serialization {
        reason: e.to_string(),
    })
}
