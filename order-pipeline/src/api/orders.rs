//! Order submission endpoints

use axum::body::Bytes;
use axum::extract::State;
use shared::error::AppError;

use super::IngressState;
use crate::intake::{InvocationEvent, InvocationResponse, Payload};

/// POST /pedidos: the raw request body is the order payload
pub async fn submit_order(State(handler): State<IngressState>, body: Bytes) -> InvocationResponse {
    handler.submit(Payload::from_raw_bytes(body.to_vec())).await
}

/// POST /invoke: body is a runtime invocation event `{body, isBase64Encoded}`
pub async fn invoke(State(handler): State<IngressState>, body: Bytes) -> InvocationResponse {
    match serde_json::from_slice::<InvocationEvent>(&body) {
        Ok(event) => handler.handle_event(event).await,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected invocation event");
            InvocationResponse::from_error(&AppError::invalid_format(format!(
                "Invalid invocation event: {e}"
            )))
        }
    }
}
