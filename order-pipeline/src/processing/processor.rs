//! Batch order processor
//!
//! For each message, in delivery order: parse the signal, look up the
//! order, store its receipt, mark it processed. Failures stay attached to
//! their message; [`BatchReport::acknowledge`] logs and drops them.

use std::sync::Arc;

use order_receipt::{PLACEHOLDER, ReceiptSubject, render_receipt};
use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::OrderStatus;

use super::message::{QueueEvent, QueueMessage};
use crate::infra::{BlobStore, OrderStore};

/// Fixed acknowledgment returned for every batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchAck {
    pub status: &'static str,
}

impl BatchAck {
    pub const OK: Self = Self { status: "ok" };
}

/// What a successfully processed message produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedMessage {
    pub order_id: String,
    pub receipt_key: String,
    /// No stored order was found; the receipt carries placeholders
    pub placeholder: bool,
}

#[derive(Debug)]
pub struct MessageOutcome {
    pub message_id: String,
    pub result: AppResult<ProcessedMessage>,
}

/// Per-message results of one batch, in delivery order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<MessageOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Log every failure and acknowledge the whole batch
    ///
    /// Failed messages are not retried.
    pub fn acknowledge(self) -> BatchAck {
        for outcome in &self.outcomes {
            if let Err(err) = &outcome.result {
                tracing::error!(
                    message_id = %outcome.message_id,
                    code = %err.code,
                    error = %err,
                    "Failed to process record"
                );
            }
        }
        tracing::info!(
            total = self.outcomes.len(),
            failed = self.failed(),
            "Batch acknowledged"
        );
        BatchAck::OK
    }
}

/// Turns queue signals into stored receipts and processed orders
pub struct BatchProcessor {
    store: Arc<dyn OrderStore>,
    blobs: Arc<dyn BlobStore>,
    bucket: String,
}

impl BatchProcessor {
    pub fn new(
        store: Arc<dyn OrderStore>,
        blobs: Arc<dyn BlobStore>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            store,
            blobs,
            bucket: bucket.into(),
        }
    }

    /// Handle a runtime event and return the acknowledgment
    pub async fn handle_event(&self, event: QueueEvent) -> BatchAck {
        self.process_batch(&event.records).await.acknowledge()
    }

    /// Process every message sequentially; one failure never stops the rest
    pub async fn process_batch(&self, messages: &[QueueMessage]) -> BatchReport {
        let mut outcomes = Vec::with_capacity(messages.len());
        for message in messages {
            outcomes.push(MessageOutcome {
                message_id: message.message_id.clone(),
                result: self.process_message(message).await,
            });
        }
        BatchReport { outcomes }
    }

    /// Process one message
    ///
    /// The status update runs only after the receipt is stored. Running the
    /// same message again rewrites the same receipt and status.
    pub async fn process_message(&self, message: &QueueMessage) -> AppResult<ProcessedMessage> {
        let signal = message.parse_signal()?;
        let subject = self.resolve_subject(&signal.id).await?;
        let placeholder = subject.is_placeholder();
        if placeholder {
            tracing::warn!(order_id = %signal.id, "Order not found, using placeholder receipt");
        }

        let receipt = render_receipt(&subject)
            .map_err(|e| AppError::with_message(ErrorCode::ReceiptRenderFailed, e.to_string()))?;
        self.blobs
            .put(&self.bucket, &receipt.key, receipt.bytes, receipt.content_type)
            .await?;

        self.store.set_status(&signal.id, OrderStatus::Processed).await?;

        tracing::info!(
            order_id = %signal.id,
            receipt_key = %receipt.key,
            "Order processed"
        );
        Ok(ProcessedMessage {
            order_id: signal.id,
            receipt_key: receipt.key,
            placeholder,
        })
    }

    /// Receipt fields for an order id; missing attributes print as placeholders
    pub async fn resolve_subject(&self, order_id: &str) -> AppResult<ReceiptSubject> {
        let Some(stored) = self.store.get(order_id).await? else {
            return Ok(ReceiptSubject::placeholder(order_id));
        };
        Ok(ReceiptSubject::new(
            order_id,
            stored.customer.unwrap_or_else(|| PLACEHOLDER.to_string()),
            stored
                .table_number
                .map_or_else(|| PLACEHOLDER.to_string(), |n| n.to_string()),
            stored.items,
        ))
    }
}
