//! Raw invocation payloads

use serde::Deserialize;
use serde_json::{Map, Value};

/// Characters of the raw body kept for debug logging
const PREVIEW_CHARS: usize = 300;

/// Body of an ingress invocation, as delivered
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Already-structured mapping
    Structured(Map<String, Value>),
    /// Text: JSON, base64 of JSON, or the loose `cliente:..,itens:[..],mesa:..` form
    Text(String),
    /// Raw bytes expected to hold UTF-8 JSON
    Bytes(Vec<u8>),
    /// No body at all
    Absent,
    /// A body of a shape no parser accepts; carries the shape name
    Unsupported(&'static str),
}

impl Payload {
    /// Classify the `body` field of an invocation event
    pub fn from_body_value(body: Option<Value>) -> Self {
        match body {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Object(map)) => Self::Structured(map),
            Some(Value::String(text)) => Self::Text(text),
            Some(Value::Array(_)) => Self::Unsupported("array"),
            Some(Value::Number(_)) => Self::Unsupported("number"),
            Some(Value::Bool(_)) => Self::Unsupported("bool"),
        }
    }

    /// Classify a raw request body
    pub fn from_raw_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Self::Absent;
        }
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structured(_) => "structured",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Absent => "absent",
            Self::Unsupported(kind) => *kind,
        }
    }

    /// Leading characters of the body, for logs
    pub fn preview(&self) -> String {
        let full = match self {
            Self::Structured(map) => Value::Object(map.clone()).to_string(),
            Self::Text(text) => text.clone(),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::Absent => String::new(),
            Self::Unsupported(kind) => format!("<{kind}>"),
        };
        full.chars().take(PREVIEW_CHARS).collect()
    }
}

/// API-Gateway-style invocation event
///
/// Only `body` and `isBase64Encoded` are read; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvocationEvent {
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(rename = "isBase64Encoded", default)]
    pub is_base64_encoded: Option<bool>,
}

impl InvocationEvent {
    pub fn with_body(body: Value) -> Self {
        Self {
            body: Some(body),
            is_base64_encoded: None,
        }
    }

    pub fn into_payload(self) -> Payload {
        Payload::from_body_value(self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_body_values() {
        assert_eq!(Payload::from_body_value(None), Payload::Absent);
        assert_eq!(Payload::from_body_value(Some(Value::Null)), Payload::Absent);
        assert_eq!(
            Payload::from_body_value(Some(json!("abc"))),
            Payload::Text("abc".into())
        );
        assert_eq!(Payload::from_body_value(Some(json!({"mesa": 1}))).kind(), "structured");
        assert_eq!(Payload::from_body_value(Some(json!([1, 2]))).kind(), "array");
        assert_eq!(Payload::from_body_value(Some(json!(7))).kind(), "number");
    }

    #[test]
    fn test_classify_raw_bytes() {
        assert_eq!(Payload::from_raw_bytes(Vec::new()), Payload::Absent);
        assert_eq!(
            Payload::from_raw_bytes(b"{}".to_vec()),
            Payload::Text("{}".into())
        );
        assert_eq!(
            Payload::from_raw_bytes(vec![0xff, 0xfe]),
            Payload::Bytes(vec![0xff, 0xfe])
        );
    }

    #[test]
    fn test_preview_truncates() {
        let payload = Payload::Text("é".repeat(400));
        assert_eq!(payload.preview().chars().count(), 300);
        assert_eq!(Payload::Absent.preview(), "");
    }

    #[test]
    fn test_event_deserialize() {
        let event: InvocationEvent = serde_json::from_value(json!({
            "body": "eyJhIjoxfQ==",
            "isBase64Encoded": true,
            "headers": {"content-type": "application/json"}
        }))
        .unwrap();
        assert_eq!(event.is_base64_encoded, Some(true));
        assert_eq!(event.into_payload(), Payload::Text("eyJhIjoxfQ==".into()));

        let event: InvocationEvent = serde_json::from_value(json!({})).unwrap();
        assert_eq!(event.into_payload(), Payload::Absent);
    }
}
