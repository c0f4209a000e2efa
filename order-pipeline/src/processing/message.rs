//! Queue message shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult};
use shared::models::QueueSignal;

pub const MSG_MISSING_ID: &str = "Mensagem SQS sem 'id' do pedido";

/// One delivered queue message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMessage {
    #[serde(rename = "messageId", default)]
    pub message_id: String,
    /// Present only when the message came from a receive call
    #[serde(rename = "receiptHandle", default, skip_serializing_if = "Option::is_none")]
    pub receipt_handle: Option<String>,
    /// JSON text or an already-structured value
    #[serde(default)]
    pub body: Value,
}

impl QueueMessage {
    pub fn new(message_id: impl Into<String>, body: impl Into<Value>) -> Self {
        Self {
            message_id: message_id.into(),
            receipt_handle: None,
            body: body.into(),
        }
    }

    /// Extract the queue signal carried in the body
    pub fn parse_signal(&self) -> AppResult<QueueSignal> {
        let parsed;
        let record = match &self.body {
            Value::String(text) => {
                parsed = serde_json::from_str::<Value>(text).map_err(|e| {
                    AppError::invalid_signal(format!("Message body is not JSON: {e}"))
                })?;
                &parsed
            }
            other => other,
        };

        match record.get("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => Ok(QueueSignal::new(id.clone())),
            _ => Err(AppError::invalid_signal(MSG_MISSING_ID)),
        }
    }
}

/// Runtime event carrying a batch: `{"Records": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<QueueMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::error::ErrorCode;

    #[test]
    fn test_parse_text_body() {
        let message = QueueMessage::new("m1", r#"{"id":"abc"}"#);
        assert_eq!(message.parse_signal().unwrap(), QueueSignal::new("abc"));
    }

    #[test]
    fn test_parse_structured_body() {
        let message = QueueMessage::new("m1", json!({"id": "abc", "extra": 1}));
        assert_eq!(message.parse_signal().unwrap().id, "abc");
    }

    #[test]
    fn test_missing_or_empty_id() {
        for body in [json!({}), json!({"id": ""}), json!({"id": 7}), json!(["abc"]), Value::Null] {
            let err = QueueMessage::new("m", body).parse_signal().unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidSignal);
            assert_eq!(err.message, MSG_MISSING_ID);
        }
    }

    #[test]
    fn test_malformed_json_body() {
        let err = QueueMessage::new("m", "{not json").parse_signal().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSignal);
        assert!(err.message.starts_with("Message body is not JSON"));
    }

    #[test]
    fn test_event_deserialize() {
        let event: QueueEvent = serde_json::from_value(json!({
            "Records": [
                {
                    "messageId": "1",
                    "receiptHandle": "rh",
                    "body": "{\"id\":\"a\"}",
                    "eventSource": "aws:sqs"
                },
                {"messageId": "2", "body": {"id": "b"}}
            ]
        }))
        .unwrap();
        assert_eq!(event.records.len(), 2);
        assert_eq!(event.records[0].receipt_handle.as_deref(), Some("rh"));
        assert_eq!(event.records[1].parse_signal().unwrap().id, "b");

        let empty: QueueEvent = serde_json::from_value(json!({})).unwrap();
        assert!(empty.records.is_empty());
    }
}
