//! Queue poller
//!
//! Long-polls the processing queue and feeds each received batch to the
//! [`BatchProcessor`]. Every received message is deleted after its batch
//! ran, whatever its outcome.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::message::QueueMessage;
use super::processor::{BatchAck, BatchProcessor};
use crate::infra::{QueueError, SignalQueue};

/// Pause after a failed receive
const RETRY_DELAY: Duration = Duration::from_secs(5);
/// Pause after an empty short poll
const IDLE_DELAY: Duration = Duration::from_secs(1);

pub struct QueuePoller {
    queue: Arc<dyn SignalQueue>,
    processor: Arc<BatchProcessor>,
    queue_url: String,
    max_messages: i32,
    wait_seconds: i32,
}

impl QueuePoller {
    pub fn new(
        queue: Arc<dyn SignalQueue>,
        processor: Arc<BatchProcessor>,
        queue_url: impl Into<String>,
    ) -> Self {
        Self {
            queue,
            processor,
            queue_url: queue_url.into(),
            max_messages: 10,
            wait_seconds: 20,
        }
    }

    /// Receive settings; clamped to what the queue accepts
    pub fn with_receive_settings(mut self, max_messages: i32, wait_seconds: i32) -> Self {
        self.max_messages = max_messages.clamp(1, 10);
        self.wait_seconds = wait_seconds.clamp(0, 20);
        self
    }

    /// Receive one batch and process it; returns how many messages arrived
    pub async fn poll_once(&self) -> Result<usize, QueueError> {
        let messages = self.receive().await?;
        let count = messages.len();
        if count > 0 {
            self.handle_batch(&messages).await;
        }
        Ok(count)
    }

    /// Process a received batch, then delete every message in it
    pub async fn handle_batch(&self, messages: &[QueueMessage]) -> BatchAck {
        let report = self.processor.process_batch(messages).await;

        for message in messages {
            let Some(handle) = message.receipt_handle.as_deref() else {
                continue;
            };
            if let Err(e) = self.queue.delete(&self.queue_url, handle).await {
                tracing::warn!(
                    message_id = %message.message_id,
                    error = %e,
                    "Failed to delete queue message"
                );
            }
        }

        report.acknowledge()
    }

    /// Poll until `shutdown` fires
    ///
    /// A batch already received is always finished before stopping.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(queue_url = %self.queue_url, "Queue poller started");

        loop {
            let received = tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Queue poller received shutdown signal");
                    break;
                }
                received = self.receive() => received,
            };

            let pause = match received {
                Ok(messages) if messages.is_empty() => {
                    (self.wait_seconds == 0).then_some(IDLE_DELAY)
                }
                Ok(messages) => {
                    tracing::debug!(count = messages.len(), "Received queue batch");
                    self.handle_batch(&messages).await;
                    None
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to receive from queue");
                    Some(RETRY_DELAY)
                }
            };

            if let Some(pause) = pause {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::info!("Queue poller received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }

        tracing::info!("Queue poller stopped");
    }

    async fn receive(&self) -> Result<Vec<QueueMessage>, QueueError> {
        self.queue
            .receive(&self.queue_url, self.max_messages, self.wait_seconds)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MemoryBlobStore, MemoryOrderStore};
    use shared::models::QueueSignal;

    const QUEUE: &str = "local-pedidos";

    fn poller() -> (Arc<crate::infra::MemorySignalQueue>, Arc<MemoryBlobStore>, QueuePoller) {
        let queue = Arc::new(crate::infra::MemorySignalQueue::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let processor = Arc::new(BatchProcessor::new(
            Arc::new(MemoryOrderStore::new()),
            blobs.clone(),
            "comprovantes",
        ));
        let poller = QueuePoller::new(queue.clone(), processor, QUEUE).with_receive_settings(10, 0);
        (queue, blobs, poller)
    }

    #[tokio::test]
    async fn test_poll_once_processes_and_deletes_all() {
        let (queue, blobs, poller) = poller();
        queue.send(QUEUE, &QueueSignal::new("a").to_body()).await.unwrap();
        queue.send(QUEUE, "{\"sem\":\"id\"}").await.unwrap();

        assert_eq!(poller.poll_once().await.unwrap(), 2);
        assert_eq!(queue.in_flight_count(), 0);
        assert_eq!(queue.ready_count(QUEUE), 0);
        assert_eq!(blobs.keys("comprovantes"), vec!["pedido-a.pdf".to_string()]);

        assert_eq!(poller.poll_once().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_poll_once_surfaces_receive_errors() {
        let (queue, _, poller) = poller();
        queue.fail_requests(true);
        assert!(poller.poll_once().await.is_err());
    }

    #[test]
    fn test_receive_settings_clamped() {
        let (_, _, poller) = poller();
        let poller = poller.with_receive_settings(0, 99);
        assert_eq!(poller.max_messages, 1);
        assert_eq!(poller.wait_seconds, 20);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let (queue, blobs, poller) = poller();
        queue.send(QUEUE, &QueueSignal::new("a").to_body()).await.unwrap();

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(poller.run(shutdown.clone()));

        for _ in 0..50 {
            if !blobs.keys("comprovantes").is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(blobs.keys("comprovantes"), vec!["pedido-a.pdf".to_string()]);
    }
}
