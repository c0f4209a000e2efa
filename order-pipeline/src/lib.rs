//! Order intake pipeline
//!
//! Two stages joined by a queue:
//!
//! - **Ingress** (`intake`): normalizes a loosely-typed submission, validates
//!   it, stores the order as `RECEBIDO` and publishes `{"id": ...}`.
//! - **Processing** (`processing`): consumes signal batches, stores a receipt
//!   per order and marks it `PROCESSADO`, isolating failures per message.
//!
//! # Module layout
//!
//! ```text
//! order-pipeline/src/
//! ├── intake/      # payload, normalizer, validator, ingress handler
//! ├── processing/  # queue messages, batch processor, poller
//! ├── infra/       # store / queue / blob traits, AWS and in-memory adapters
//! ├── api/         # axum ingress routes
//! ├── clients.rs   # process-wide AWS clients
//! ├── config.rs    # environment configuration
//! ├── logger.rs    # tracing setup
//! └── server.rs    # run modes
//! ```

pub mod api;
pub mod clients;
pub mod config;
pub mod infra;
pub mod intake;
pub mod logger;
pub mod processing;
pub mod server;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// Re-export
pub use config::Config;
pub use intake::{IngressHandler, InvocationEvent, InvocationResponse, Payload};
pub use processing::{BatchAck, BatchProcessor, QueueEvent, QueueMessage, QueuePoller};
pub use server::Mode;
