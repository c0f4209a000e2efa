//! In-process adapters
//!
//! Back the capability traits with plain maps so the pipeline can run
//! without AWS. Each adapter has a failing mode for exercising
//! infrastructure errors.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use serde_json::Value;
use shared::models::{Order, OrderStatus};
use tokio::sync::Notify;
use tokio::time::{Duration, timeout};
use uuid::Uuid;

use super::{
    BlobStore, BlobStoreError, OrderStore, QueueError, SignalQueue, StoreError, StoredOrder,
};
use crate::processing::QueueMessage;

// ========== Order store ==========

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    items: DashMap<String, StoredOrder>,
    failing: AtomicBool,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a backend error
    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of an item, bypassing the failing switch
    pub fn snapshot(&self, id: &str) -> Option<StoredOrder> {
        self.items.get(id).map(|item| item.clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("memory store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn put(&self, order: &Order) -> Result<(), StoreError> {
        self.check()?;
        self.items
            .insert(order.id.clone(), StoredOrder::from(order.clone()));
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredOrder>, StoreError> {
        self.check()?;
        Ok(self.snapshot(id))
    }

    async fn set_status(&self, id: &str, status: OrderStatus) -> Result<(), StoreError> {
        self.check()?;
        self.items
            .entry(id.to_string())
            .and_modify(|item| item.status = Some(status))
            .or_insert_with(|| StoredOrder::status_only(id, status));
        Ok(())
    }
}

// ========== Signal queue ==========

#[derive(Debug, Default)]
struct QueueState {
    ready: HashMap<String, VecDeque<PendingMessage>>,
    in_flight: HashMap<String, (String, PendingMessage)>,
    sent: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct PendingMessage {
    message_id: String,
    body: String,
}

/// Queue with per-url FIFO delivery
///
/// Received messages stay in flight until deleted. There is no visibility
/// timeout, so an undeleted message is never redelivered.
#[derive(Debug, Default)]
pub struct MemorySignalQueue {
    state: Mutex<QueueState>,
    arrived: Notify,
    failing: AtomicBool,
}

impl MemorySignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every `(queue_url, body)` ever sent, in send order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.state.lock().sent.clone()
    }

    /// Messages waiting to be received on a queue
    pub fn ready_count(&self, queue_url: &str) -> usize {
        self.state
            .lock()
            .ready
            .get(queue_url)
            .map_or(0, VecDeque::len)
    }

    /// Messages received but not yet deleted, across all queues
    pub fn in_flight_count(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    fn check(&self) -> Result<(), QueueError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(QueueError::Backend("memory queue unavailable".into()));
        }
        Ok(())
    }

    fn take_ready(&self, queue_url: &str, max_messages: usize) -> Vec<QueueMessage> {
        let mut state = self.state.lock();
        let mut taken = Vec::new();
        while taken.len() < max_messages {
            let Some(message) = state.ready.get_mut(queue_url).and_then(VecDeque::pop_front)
            else {
                break;
            };
            let receipt_handle = Uuid::new_v4().to_string();
            taken.push(QueueMessage {
                message_id: message.message_id.clone(),
                receipt_handle: Some(receipt_handle.clone()),
                body: Value::String(message.body.clone()),
            });
            state
                .in_flight
                .insert(receipt_handle, (queue_url.to_string(), message));
        }
        taken
    }
}

#[async_trait]
impl SignalQueue for MemorySignalQueue {
    async fn send(&self, queue_url: &str, body: &str) -> Result<String, QueueError> {
        self.check()?;
        let message_id = Uuid::new_v4().to_string();
        {
            let mut state = self.state.lock();
            state
                .ready
                .entry(queue_url.to_string())
                .or_default()
                .push_back(PendingMessage {
                    message_id: message_id.clone(),
                    body: body.to_string(),
                });
            state.sent.push((queue_url.to_string(), body.to_string()));
        }
        self.arrived.notify_waiters();
        Ok(message_id)
    }

    async fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_seconds: i32,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        self.check()?;
        let max = usize::try_from(max_messages.max(1)).unwrap_or(1);

        let taken = self.take_ready(queue_url, max);
        if !taken.is_empty() || wait_seconds <= 0 {
            return Ok(taken);
        }

        let wait = Duration::from_secs(u64::try_from(wait_seconds).unwrap_or(0));
        let arrived = self.arrived.notified();
        // A send may have landed between the first take and registering interest
        let taken = self.take_ready(queue_url, max);
        if !taken.is_empty() {
            return Ok(taken);
        }
        let _ = timeout(wait, arrived).await;
        Ok(self.take_ready(queue_url, max))
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), QueueError> {
        self.check()?;
        let mut state = self.state.lock();
        match state.in_flight.get(receipt_handle) {
            Some((url, _)) if url == queue_url => {
                state.in_flight.remove(receipt_handle);
                Ok(())
            }
            _ => Err(QueueError::UnknownReceipt(receipt_handle.to_string())),
        }
    }
}

// ========== Blob store ==========

/// Object held by [`MemoryBlobStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: DashMap<(String, String), StoredObject>,
    rejected: DashSet<String>,
    failing: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail writes to one key only
    pub fn reject_key(&self, key: impl Into<String>) {
        self.rejected.insert(key.into());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.clone())
    }

    /// Keys stored in a bucket, sorted
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .filter(|entry| entry.key().0 == bucket)
            .map(|entry| entry.key().1.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BlobStoreError::Backend("memory blob store unavailable".into()));
        }
        if self.rejected.contains(key) {
            return Err(BlobStoreError::Backend(format!("write to {key} rejected")));
        }
        self.objects.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
