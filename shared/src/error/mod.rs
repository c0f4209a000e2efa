//! Unified error system for the order pipeline
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors (payload parsing, validation)
//! - 4xxx: Order and queue signal errors
//! - 9xxx: System errors (configuration, store, queue, blob store)
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::validation("Campo 'mesa' é obrigatório e deve ser inteiro positivo")
//!     .with_detail("field", "mesa");
//!
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//! assert!(err.is_client_error());
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
