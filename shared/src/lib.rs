//! Shared types for the order pipeline
//!
//! Domain models and the unified error system used by the ingress
//! handler, the batch processor and the receipt renderer.

pub mod error;
pub mod models;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Order, OrderDraft, OrderStatus, QueueSignal};
pub use serde::{Deserialize, Serialize};
