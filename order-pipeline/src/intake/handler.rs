//! Order ingress handler
//!
//! normalize → validate → persist → enqueue → respond

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use serde::Serialize;
use serde_json::{Value, json};
use shared::error::{AppError, AppResult, ErrorCategory};
use shared::models::{Order, QueueSignal};
use uuid::Uuid;

use super::normalize::normalize;
use super::payload::{InvocationEvent, Payload};
use super::validate::validate;
use crate::infra::{OrderStore, SignalQueue};

pub const MSG_QUEUE_URL_MISSING: &str = "SQS_QUEUE_URL não configurada no ambiente";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Invocation result in the runtime's response shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON document, as text
    pub body: String,
}

impl InvocationResponse {
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: BTreeMap::from([("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())]),
            body: body.to_string(),
        }
    }

    /// 201 with the new order's id and status
    pub fn created(order: &Order) -> Self {
        Self::json(
            StatusCode::CREATED,
            &json!({ "id": order.id, "status": order.status }),
        )
    }

    pub fn from_error(err: &AppError) -> Self {
        Self::json(err.http_status(), &err.to_body())
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Body parsed back into JSON
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

impl IntoResponse for InvocationResponse {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
            self.body,
        )
            .into_response()
    }
}

/// Accepts order submissions and hands them to the processing queue
pub struct IngressHandler {
    store: Arc<dyn OrderStore>,
    queue: Arc<dyn SignalQueue>,
    queue_url: Option<String>,
}

impl IngressHandler {
    pub fn new(
        store: Arc<dyn OrderStore>,
        queue: Arc<dyn SignalQueue>,
        queue_url: Option<String>,
    ) -> Self {
        Self {
            store,
            queue,
            queue_url,
        }
    }

    /// Handle an API-Gateway-style invocation event
    pub async fn handle_event(&self, event: InvocationEvent) -> InvocationResponse {
        tracing::debug!(is_base64 = ?event.is_base64_encoded, "Ingress event received");
        self.submit(event.into_payload()).await
    }

    /// Run a submission and map the outcome to a response
    ///
    /// Parse and validation failures answer 400 with the reason; anything
    /// else answers 500 with the reason under `detalhes`.
    pub async fn submit(&self, payload: Payload) -> InvocationResponse {
        match self.try_submit(payload).await {
            Ok(order) => InvocationResponse::created(&order),
            Err(err) => {
                if matches!(err.code.category(), ErrorCategory::System) {
                    tracing::error!(code = %err.code, error = %err, "Order submission failed");
                } else {
                    tracing::info!(code = %err.code, error = %err, "Order submission rejected");
                }
                InvocationResponse::from_error(&err)
            }
        }
    }

    /// Submission pipeline without response mapping
    ///
    /// The order is persisted before the signal is published; a failed
    /// publish leaves it stored as received.
    pub async fn try_submit(&self, payload: Payload) -> AppResult<Order> {
        tracing::debug!(
            kind = payload.kind(),
            raw = %payload.preview(),
            "Parsing order payload"
        );

        let record = normalize(payload)?;
        let draft = validate(&record)?;

        let order = Order::received(Uuid::new_v4().to_string(), draft);
        self.store.put(&order).await?;

        let queue_url = self
            .queue_url
            .as_deref()
            .ok_or_else(|| AppError::config(MSG_QUEUE_URL_MISSING))?;
        let message_id = self
            .queue
            .send(queue_url, &QueueSignal::new(&order.id).to_body())
            .await?;

        tracing::info!(
            order_id = %order.id,
            message_id = %message_id,
            table = order.table_number,
            "Order received"
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MemoryOrderStore, MemorySignalQueue};
    use shared::models::OrderStatus;

    const QUEUE: &str = "http://localhost:4566/000000000000/pedidos";

    struct Fixture {
        store: Arc<MemoryOrderStore>,
        queue: Arc<MemorySignalQueue>,
        handler: IngressHandler,
    }

    fn fixture(queue_url: Option<&str>) -> Fixture {
        let store = Arc::new(MemoryOrderStore::new());
        let queue = Arc::new(MemorySignalQueue::new());
        let handler = IngressHandler::new(
            store.clone(),
            queue.clone(),
            queue_url.map(str::to_string),
        );
        Fixture {
            store,
            queue,
            handler,
        }
    }

    fn text(s: &str) -> Payload {
        Payload::Text(s.to_string())
    }

    #[tokio::test]
    async fn test_submit_persists_and_enqueues() {
        let f = fixture(Some(QUEUE));
        let response = f
            .handler
            .submit(text(r#"{"cliente":"Joao","itens":["Pizza"],"mesa":5}"#))
            .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers["Content-Type"], "application/json");
        let body = response.body_json();
        assert_eq!(body["status"], "RECEBIDO");
        let id = body["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());

        let stored = f.store.snapshot(id).unwrap();
        assert_eq!(stored.status, Some(OrderStatus::Received));
        assert_eq!(stored.customer.as_deref(), Some("Joao"));

        assert_eq!(
            f.queue.sent(),
            vec![(QUEUE.to_string(), format!(r#"{{"id":"{id}"}}"#))]
        );
    }

    #[tokio::test]
    async fn test_parse_failure_is_400() {
        let f = fixture(Some(QUEUE));
        let response = f.handler.submit(Payload::Absent).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body_json(),
            json!({"erro": "Body inválido ou ausente"})
        );
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_is_400() {
        let f = fixture(Some(QUEUE));
        let response = f
            .handler
            .submit(text(r#"{"cliente":"Joao","itens":["Pizza"],"mesa":0}"#))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body_json()["erro"],
            "Campo 'mesa' é obrigatório e deve ser inteiro positivo"
        );
        assert!(f.store.is_empty());
        assert!(f.queue.sent().is_empty());
    }

    #[tokio::test]
    async fn test_missing_queue_url_is_500_after_persist() {
        let f = fixture(None);
        let response = f
            .handler
            .submit(text("cliente:Joao,itens:[Pizza],mesa:5"))
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body_json(),
            json!({
                "erro": "Falha interna",
                "detalhes": "SQS_QUEUE_URL não configurada no ambiente"
            })
        );
        assert_eq!(f.store.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_500_and_nothing_enqueued() {
        let f = fixture(Some(QUEUE));
        f.store.fail_requests(true);
        let response = f
            .handler
            .submit(text(r#"{"cliente":"Joao","itens":["Pizza"],"mesa":5}"#))
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body_json()["erro"], "Falha interna");
        assert!(f.queue.sent().is_empty());
    }

    #[tokio::test]
    async fn test_queue_failure_leaves_order_received() {
        let f = fixture(Some(QUEUE));
        f.queue.fail_requests(true);
        let err = f
            .handler
            .try_submit(text(r#"{"cliente":"Joao","itens":["Pizza"],"mesa":5}"#))
            .await
            .unwrap_err();

        assert_eq!(err.code, shared::error::ErrorCode::QueueError);
        assert_eq!(f.store.len(), 1);
    }

    #[tokio::test]
    async fn test_handle_event_structured_body() {
        let f = fixture(Some(QUEUE));
        let event = InvocationEvent::with_body(json!({
            "cliente": "Ana",
            "itens": ["Suco"],
            "mesa": 2
        }));
        let response = f.handler.handle_event(event).await;
        assert_eq!(response.status_code, 201);
    }

    #[test]
    fn test_response_serializes_in_runtime_shape() {
        let response = InvocationResponse::json(StatusCode::BAD_REQUEST, &json!({"erro": "x"}));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "statusCode": 400,
                "headers": {"Content-Type": "application/json"},
                "body": "{\"erro\":\"x\"}"
            })
        );
    }
}
