//! Error types for receipt rendering

use thiserror::Error;

/// Receipt error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReceiptError {
    /// The order id is empty; no storage key can be derived
    #[error("Receipt requires an order id")]
    MissingOrderId,
}

/// Result type for receipt operations
pub type ReceiptResult<T> = Result<T, ReceiptError>;
