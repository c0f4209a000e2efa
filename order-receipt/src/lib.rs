//! # order-receipt
//!
//! Receipt artifact synthesis for processed orders.
//!
//! ## Scope
//!
//! This crate handles HOW a receipt is laid out:
//! - a minimal document container header
//! - line-oriented text body
//! - storage key and content type
//!
//! Looking up orders and storing the bytes stays in the pipeline crate.
//!
//! ## Example
//!
//! ```
//! use order_receipt::{ReceiptSubject, render_receipt};
//!
//! let subject = ReceiptSubject::new("42", "Joao", "5", vec!["Pizza".into()]);
//! let receipt = render_receipt(&subject).unwrap();
//!
//! assert_eq!(receipt.key, "pedido-42.pdf");
//! assert!(receipt.bytes.starts_with(b"%PDF-1.4\n"));
//! ```

mod builder;
mod error;
mod renderer;

// Re-exports
pub use builder::ReceiptBuilder;
pub use error::{ReceiptError, ReceiptResult};
pub use renderer::{
    CONTENT_TYPE, PLACEHOLDER, Receipt, ReceiptSubject, receipt_key, render_receipt,
};
