//! Capability interfaces for the external collaborators
//!
//! ```text
//!      ┌────────────┐   ┌─────────────┐   ┌───────────┐
//!      │ OrderStore │   │ SignalQueue │   │ BlobStore │  ◄── traits
//!      └─────┬──────┘   └──────┬──────┘   └─────┬─────┘
//!            │                 │                │
//!   DynamoOrderStore    SqsSignalQueue     S3BlobStore     (AWS)
//!   MemoryOrderStore    MemorySignalQueue  MemoryBlobStore (in-process)
//! ```

mod dynamo;
mod memory;
mod s3;
mod sqs;

pub use dynamo::DynamoOrderStore;
pub use memory::{MemoryBlobStore, MemoryOrderStore, MemorySignalQueue, StoredObject};
pub use s3::S3BlobStore;
pub use sqs::SqsSignalQueue;

use async_trait::async_trait;
use shared::error::AppError;
use shared::models::{Order, OrderStatus};
use thiserror::Error;

use crate::processing::QueueMessage;

/// Key-value store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Backend(String),

    #[error("Stored order is malformed: {0}")]
    Malformed(String),
}

/// Message queue errors
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue request failed: {0}")]
    Backend(String),

    #[error("Unknown receipt handle: {0}")]
    UnknownReceipt(String),
}

/// Blob store errors
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("Blob store request failed: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::database(err.to_string())
    }
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        AppError::queue(err.to_string())
    }
}

impl From<BlobStoreError> for AppError {
    fn from(err: BlobStoreError) -> Self {
        AppError::storage(err.to_string())
    }
}

/// Attributes actually present on a stored order item
///
/// A status-only update against an unknown id leaves an item with nothing
/// but `id` and `status`, so every other attribute is optional here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredOrder {
    pub id: String,
    pub customer: Option<String>,
    pub items: Vec<String>,
    pub table_number: Option<i64>,
    pub status: Option<OrderStatus>,
}

impl StoredOrder {
    /// Item created by a status update on an id that was never written
    pub fn status_only(id: impl Into<String>, status: OrderStatus) -> Self {
        Self {
            id: id.into(),
            status: Some(status),
            ..Self::default()
        }
    }
}

impl From<Order> for StoredOrder {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer: Some(order.customer),
            items: order.items,
            table_number: Some(order.table_number),
            status: Some(order.status),
        }
    }
}

/// Persistent order table keyed by `id`
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Write the whole order, replacing any existing item with the same id
    async fn put(&self, order: &Order) -> Result<(), StoreError>;

    /// Fetch an order by id
    async fn get(&self, id: &str) -> Result<Option<StoredOrder>, StoreError>;

    /// Set only the `status` attribute; not conditioned on the previous value
    async fn set_status(&self, id: &str, status: OrderStatus) -> Result<(), StoreError>;
}

/// Message queue carrying queue signals
#[async_trait]
pub trait SignalQueue: Send + Sync {
    /// Publish a message body, returning the queue-assigned message id
    async fn send(&self, queue_url: &str, body: &str) -> Result<String, QueueError>;

    /// Receive up to `max_messages`, waiting at most `wait_seconds` for one to arrive
    async fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_seconds: i32,
    ) -> Result<Vec<QueueMessage>, QueueError>;

    /// Remove a received message from the queue
    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), QueueError>;
}

/// Object storage for receipts
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use shared::models::OrderDraft;

    #[test]
    fn test_adapter_errors_map_to_system_codes() {
        let err: AppError = StoreError::Backend("timeout".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Store request failed: timeout");

        let err: AppError = QueueError::Backend("denied".into()).into();
        assert_eq!(err.code, ErrorCode::QueueError);

        let err: AppError = BlobStoreError::Backend("no bucket".into()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_stored_order_from_order() {
        let order = Order::received(
            "o-1",
            OrderDraft {
                customer: "Ana".into(),
                items: vec!["Suco".into()],
                table_number: 3,
            },
        );
        let stored = StoredOrder::from(order);
        assert_eq!(stored.customer.as_deref(), Some("Ana"));
        assert_eq!(stored.table_number, Some(3));
        assert_eq!(stored.status, Some(OrderStatus::Received));
    }

    #[test]
    fn test_status_only_item() {
        let stored = StoredOrder::status_only("ghost", OrderStatus::Processed);
        assert_eq!(stored.id, "ghost");
        assert!(stored.customer.is_none());
        assert!(stored.items.is_empty());
        assert_eq!(stored.status, Some(OrderStatus::Processed));
    }
}
