//! DynamoDB-backed order store
//!
//! Item layout: `id` (S, key), `cliente` (S), `itens` (L of S), `mesa` (N),
//! `status` (S).

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use shared::models::{Order, OrderStatus};

use super::{OrderStore, StoreError, StoredOrder};

const ATTR_ID: &str = "id";
const ATTR_CUSTOMER: &str = "cliente";
const ATTR_ITEMS: &str = "itens";
const ATTR_TABLE: &str = "mesa";
const ATTR_STATUS: &str = "status";

/// Order store on a single DynamoDB table
#[derive(Debug, Clone)]
pub struct DynamoOrderStore {
    client: Client,
    table: String,
}

impl DynamoOrderStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl OrderStore for DynamoOrderStore {
    async fn put(&self, order: &Order) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(order_to_item(order)))
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredOrder>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(ATTR_ID, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))?;

        output.item().map(item_to_stored).transpose()
    }

    async fn set_status(&self, id: &str, status: OrderStatus) -> Result<(), StoreError> {
        self.client
            .update_item()
            .table_name(&self.table)
            .key(ATTR_ID, AttributeValue::S(id.to_string()))
            .update_expression("SET #s = :status")
            .expression_attribute_names("#s", ATTR_STATUS)
            .expression_attribute_values(":status", AttributeValue::S(status.as_str().to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

fn order_to_item(order: &Order) -> HashMap<String, AttributeValue> {
    let items = order
        .items
        .iter()
        .map(|item| AttributeValue::S(item.clone()))
        .collect();

    HashMap::from([
        (ATTR_ID.to_string(), AttributeValue::S(order.id.clone())),
        (
            ATTR_CUSTOMER.to_string(),
            AttributeValue::S(order.customer.clone()),
        ),
        (ATTR_ITEMS.to_string(), AttributeValue::L(items)),
        (
            ATTR_TABLE.to_string(),
            AttributeValue::N(order.table_number.to_string()),
        ),
        (
            ATTR_STATUS.to_string(),
            AttributeValue::S(order.status.as_str().to_string()),
        ),
    ])
}

fn item_to_stored(item: &HashMap<String, AttributeValue>) -> Result<StoredOrder, StoreError> {
    let id = item
        .get(ATTR_ID)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| StoreError::Malformed("item has no string 'id'".into()))?
        .clone();

    let customer = item
        .get(ATTR_CUSTOMER)
        .and_then(|v| v.as_s().ok())
        .cloned();

    let items = match item.get(ATTR_ITEMS) {
        None => Vec::new(),
        Some(AttributeValue::L(values)) => values
            .iter()
            .map(|v| {
                v.as_s().cloned().map_err(|_| {
                    StoreError::Malformed(format!("order {id}: non-string entry in '{ATTR_ITEMS}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(AttributeValue::Ss(values)) => values.clone(),
        Some(_) => {
            return Err(StoreError::Malformed(format!(
                "order {id}: '{ATTR_ITEMS}' is not a list"
            )));
        }
    };

    let table_number = match item.get(ATTR_TABLE).map(|v| v.as_n()) {
        None => None,
        Some(Ok(n)) => Some(n.parse::<i64>().map_err(|_| {
            StoreError::Malformed(format!("order {id}: '{ATTR_TABLE}' is not an integer"))
        })?),
        Some(Err(_)) => {
            return Err(StoreError::Malformed(format!(
                "order {id}: '{ATTR_TABLE}' is not a number"
            )));
        }
    };

    let status = item
        .get(ATTR_STATUS)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| s.parse::<OrderStatus>().ok());

    Ok(StoredOrder {
        id,
        customer,
        items,
        table_number,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderDraft;

    fn sample_order() -> Order {
        Order::received(
            "5b1c",
            OrderDraft {
                customer: "Joao".into(),
                items: vec!["Pizza".into(), "Refri".into()],
                table_number: 5,
            },
        )
    }

    #[test]
    fn test_order_to_item_layout() {
        let item = order_to_item(&sample_order());
        assert_eq!(item.get("id"), Some(&AttributeValue::S("5b1c".into())));
        assert_eq!(item.get("mesa"), Some(&AttributeValue::N("5".into())));
        assert_eq!(
            item.get("status"),
            Some(&AttributeValue::S("RECEBIDO".into()))
        );
        assert_eq!(
            item.get("itens"),
            Some(&AttributeValue::L(vec![
                AttributeValue::S("Pizza".into()),
                AttributeValue::S("Refri".into()),
            ]))
        );
    }

    #[test]
    fn test_item_roundtrip() {
        let order = sample_order();
        let stored = item_to_stored(&order_to_item(&order)).unwrap();
        assert_eq!(stored, StoredOrder::from(order));
    }

    #[test]
    fn test_status_only_item() {
        let item = HashMap::from([
            ("id".to_string(), AttributeValue::S("ghost".into())),
            ("status".to_string(), AttributeValue::S("PROCESSADO".into())),
        ]);
        let stored = item_to_stored(&item).unwrap();
        assert_eq!(stored, StoredOrder::status_only("ghost", OrderStatus::Processed));
    }

    #[test]
    fn test_malformed_items() {
        let item = HashMap::from([
            ("id".to_string(), AttributeValue::S("x".into())),
            ("mesa".to_string(), AttributeValue::S("cinco".into())),
        ]);
        assert!(matches!(
            item_to_stored(&item),
            Err(StoreError::Malformed(_))
        ));

        let item = HashMap::from([("mesa".to_string(), AttributeValue::N("1".into()))]);
        assert!(matches!(
            item_to_stored(&item),
            Err(StoreError::Malformed(_))
        ));
    }
}
