use async_trait::async_trait;
use aws_sdk_sqs::Client;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::Message;
use serde_json::Value;

use super::{QueueError, SignalQueue};
use crate::processing::QueueMessage;

/// SQS-backed signal queue
#[derive(Debug, Clone)]
pub struct SqsSignalQueue {
    client: Client,
}

impl SqsSignalQueue {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SignalQueue for SqsSignalQueue {
    async fn send(&self, queue_url: &str, body: &str) -> Result<String, QueueError> {
        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| QueueError::Backend(DisplayErrorContext(&e).to_string()))?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }

    async fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_seconds: i32,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_seconds)
            .send()
            .await
            .map_err(|e| QueueError::Backend(DisplayErrorContext(&e).to_string()))?;

        Ok(output.messages().iter().map(to_queue_message).collect())
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

fn to_queue_message(message: &Message) -> QueueMessage {
    QueueMessage {
        message_id: message.message_id().unwrap_or_default().to_string(),
        receipt_handle: message.receipt_handle().map(str::to_string),
        body: message
            .body()
            .map_or(Value::Null, |body| Value::String(body.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_queue_message() {
        let message = Message::builder()
            .message_id("m-1")
            .receipt_handle("rh-1")
            .body(r#"{"id":"abc"}"#)
            .build();

        let converted = to_queue_message(&message);
        assert_eq!(converted.message_id, "m-1");
        assert_eq!(converted.receipt_handle.as_deref(), Some("rh-1"));
        assert_eq!(converted.body, Value::String(r#"{"id":"abc"}"#.into()));
    }

    #[test]
    fn test_to_queue_message_without_body() {
        let converted = to_queue_message(&Message::builder().build());
        assert_eq!(converted.message_id, "");
        assert!(converted.receipt_handle.is_none());
        assert!(converted.body.is_null());
    }
}
