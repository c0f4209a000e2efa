//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    ///
    /// Only payload and validation problems are the caller's fault; every
    /// other failure surfaces as 500.
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            Self::ValidationFailed | Self::InvalidFormat | Self::InvalidSignal => {
                StatusCode::BAD_REQUEST
            }

            // 500 Internal Server Error
            Self::ReceiptRenderFailed
            | Self::DatabaseError
            | Self::ConfigError
            | Self::QueueError
            | Self::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
