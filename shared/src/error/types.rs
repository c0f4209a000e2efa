//! Error type and response body shape

use super::codes::ErrorCode;
use http::StatusCode;
use serde_json::{Value, json};
use std::collections::HashMap;
use thiserror::Error;

/// Fixed client-facing label for server-side failures
pub const INTERNAL_FAILURE_LABEL: &str = "Falha interna";

/// Application error with structured error code and details
///
/// The primary error type of the pipeline:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for logging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field name, order id, ...)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Whether the caller caused this error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// JSON body sent back to the caller
    ///
    /// Client errors expose the message as `erro`; server errors hide it
    /// behind a fixed label and move it to `detalhes`.
    pub fn to_body(&self) -> Value {
        if self.is_client_error() {
            json!({ "erro": self.message })
        } else {
            json!({ "erro": INTERNAL_FAILURE_LABEL, "detalhes": self.message })
        }
    }

    // ==================== Convenience constructors ====================

    /// Payload could not be parsed (ParseError)
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidFormat, msg)
    }

    /// Field-level validation failed (ValidationError)
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Required configuration is missing (ConfigurationError)
    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }

    /// Key-value store failure
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Message queue failure
    pub fn queue(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::QueueError, msg)
    }

    /// Blob store failure
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }

    /// Per-message defect in batch processing (MessageError)
    pub fn invalid_signal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidSignal, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
