//! Data models shared across the pipeline

pub mod order;

pub use order::{Order, OrderDraft, OrderStatus, QueueSignal};
