//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// Moves from `Received` to `Processed` exactly once and never back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "RECEBIDO")]
    Received,
    #[serde(rename = "PROCESSADO")]
    Processed,
}

impl OrderStatus {
    /// Wire/storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "RECEBIDO",
            Self::Processed => "PROCESSADO",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEBIDO" => Ok(Self::Received),
            "PROCESSADO" => Ok(Self::Processed),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Validated order fields, before an id has been assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(rename = "cliente")]
    pub customer: String,
    #[serde(rename = "itens")]
    pub items: Vec<String>,
    #[serde(rename = "mesa")]
    pub table_number: i64,
}

/// Order entity as persisted in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(rename = "cliente")]
    pub customer: String,
    #[serde(rename = "itens")]
    pub items: Vec<String>,
    #[serde(rename = "mesa")]
    pub table_number: i64,
    pub status: OrderStatus,
}

impl Order {
    /// Build a freshly received order from a validated draft
    pub fn received(id: impl Into<String>, draft: OrderDraft) -> Self {
        Self {
            id: id.into(),
            customer: draft.customer,
            items: draft.items,
            table_number: draft.table_number,
            status: OrderStatus::Received,
        }
    }
}

/// Message sent to the processing queue; carries only the order id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSignal {
    pub id: String,
}

impl QueueSignal {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// JSON message body: `{"id": "..."}`
    pub fn to_body(&self) -> String {
        serde_json::json!({ "id": self.id }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> OrderDraft {
        OrderDraft {
            customer: "Joao".to_string(),
            items: vec!["Pizza".to_string(), "Refri".to_string()],
            table_number: 5,
        }
    }

    #[test]
    fn test_received_order_starts_received() {
        let order = Order::received("abc", draft());
        assert_eq!(order.id, "abc");
        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(order.table_number, 5);
    }

    #[test]
    fn test_order_wire_names() {
        let order = Order::received("abc", draft());
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["cliente"], "Joao");
        assert_eq!(value["itens"][1], "Refri");
        assert_eq!(value["mesa"], 5);
        assert_eq!(value["status"], "RECEBIDO");
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(OrderStatus::Processed.as_str(), "PROCESSADO");
        assert_eq!("RECEBIDO".parse::<OrderStatus>(), Ok(OrderStatus::Received));
        assert!("DONE".parse::<OrderStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processed).unwrap(),
            "\"PROCESSADO\""
        );
    }

    #[test]
    fn test_queue_signal_body() {
        let signal = QueueSignal::new("f3a1");
        assert_eq!(signal.to_body(), r#"{"id":"f3a1"}"#);
    }
}
