//! HTTP ingress routes

pub mod health;
pub mod orders;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::intake::IngressHandler;

/// Shared state of the ingress router
pub type IngressState = Arc<IngressHandler>;

/// Create the ingress router
pub fn create_router(handler: IngressState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/pedidos", post(orders::submit_order))
        .route("/invoke", post(orders::invoke))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}
