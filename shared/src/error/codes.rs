//! Unified error codes for the order pipeline
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order / queue signal errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as plain
/// numbers in logs and response details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Field-level validation failed
    ValidationFailed = 2,
    /// Payload could not be recovered from any accepted encoding
    InvalidFormat = 6,

    // ==================== 4xxx: Order ====================
    /// Queue signal is malformed or lacks an order id
    InvalidSignal = 4101,
    /// Receipt could not be rendered
    ReceiptRenderFailed = 4201,

    // ==================== 9xxx: System ====================
    /// Key-value store call failed
    DatabaseError = 9002,
    /// Required configuration is missing or invalid
    ConfigError = 9005,
    /// Message queue call failed
    QueueError = 9101,
    /// Blob store call failed
    StorageError = 9201,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a numeric value does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            6 => Ok(ErrorCode::InvalidFormat),

            4101 => Ok(ErrorCode::InvalidSignal),
            4201 => Ok(ErrorCode::ReceiptRenderFailed),

            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::QueueError),
            9201 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidFormat.code(), 6);
        assert_eq!(ErrorCode::InvalidSignal.code(), 4101);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
        assert_eq!(ErrorCode::QueueError.code(), 9101);
        assert_eq!(ErrorCode::StorageError.code(), 9201);
    }

    #[test]
    fn test_try_from_u16() {
        assert_eq!(ErrorCode::try_from(2), Ok(ErrorCode::ValidationFailed));
        assert_eq!(ErrorCode::try_from(9101), Ok(ErrorCode::QueueError));
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(9001), Err(InvalidErrorCode(9001)));
        assert_eq!(ErrorCode::try_from(7001), Err(InvalidErrorCode(7001)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::InvalidFormat).unwrap();
        assert_eq!(json, "6");

        let parsed: ErrorCode = serde_json::from_str("9201").unwrap();
        assert_eq!(parsed, ErrorCode::StorageError);

        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
