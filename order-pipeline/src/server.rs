//! Process assembly for each run mode

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::BoxError;
use crate::api;
use crate::clients::AwsClients;
use crate::config::Config;
use crate::infra::{
    DynamoOrderStore, MemoryBlobStore, MemoryOrderStore, MemorySignalQueue, S3BlobStore,
    SqsSignalQueue,
};
use crate::intake::IngressHandler;
use crate::processing::{BatchProcessor, QueuePoller};

/// Queue url used by local mode when none is configured
pub const LOCAL_QUEUE_URL: &str = "local://pedidos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// HTTP ingress against AWS
    Ingress,
    /// Queue poller against AWS
    Processor,
    /// Ingress and poller in one process on in-memory adapters
    Local,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ingress" => Ok(Self::Ingress),
            "processor" => Ok(Self::Processor),
            "local" => Ok(Self::Local),
            other => Err(format!(
                "unknown mode '{other}', expected one of: ingress, processor, local"
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ingress => "ingress",
            Self::Processor => "processor",
            Self::Local => "local",
        })
    }
}

/// Run the given mode until a shutdown signal arrives
pub async fn run(mode: Mode, config: Config) -> Result<(), BoxError> {
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.cancel();
        });
    }

    match mode {
        Mode::Ingress => run_ingress(&config, shutdown).await,
        Mode::Processor => run_processor(&config, shutdown).await,
        Mode::Local => run_local(&config, shutdown).await,
    }
}

async fn run_ingress(config: &Config, shutdown: CancellationToken) -> Result<(), BoxError> {
    let clients = AwsClients::shared(&config.aws_settings()).await;
    if config.queue_url.is_none() {
        tracing::warn!("SQS_QUEUE_URL is not set, every submission will fail");
    }

    let handler = IngressHandler::new(
        Arc::new(DynamoOrderStore::new(clients.dynamodb.clone(), &config.table_name)),
        Arc::new(SqsSignalQueue::new(clients.sqs.clone())),
        config.queue_url.clone(),
    );
    serve_http(config, Arc::new(handler), shutdown).await
}

async fn run_processor(config: &Config, shutdown: CancellationToken) -> Result<(), BoxError> {
    let queue_url = config
        .queue_url
        .clone()
        .ok_or("SQS_QUEUE_URL must be set for the processor")?;
    let clients = AwsClients::shared(&config.aws_settings()).await;

    let processor = BatchProcessor::new(
        Arc::new(DynamoOrderStore::new(clients.dynamodb.clone(), &config.table_name)),
        Arc::new(S3BlobStore::new(clients.s3.clone())),
        &config.bucket_name,
    );
    let poller = QueuePoller::new(
        Arc::new(SqsSignalQueue::new(clients.sqs.clone())),
        Arc::new(processor),
        queue_url,
    )
    .with_receive_settings(config.poll_max_messages, config.poll_wait_seconds);

    poller.run(shutdown).await;
    Ok(())
}

async fn run_local(config: &Config, shutdown: CancellationToken) -> Result<(), BoxError> {
    let queue_url = config
        .queue_url
        .clone()
        .unwrap_or_else(|| LOCAL_QUEUE_URL.to_string());
    let store = Arc::new(MemoryOrderStore::new());
    let queue = Arc::new(MemorySignalQueue::new());
    let blobs = Arc::new(MemoryBlobStore::new());

    let handler = IngressHandler::new(store.clone(), queue.clone(), Some(queue_url.clone()));
    let processor = BatchProcessor::new(store, blobs, &config.bucket_name);
    let poller = QueuePoller::new(queue, Arc::new(processor), queue_url)
        .with_receive_settings(config.poll_max_messages, config.poll_wait_seconds);

    let poller_handle = tokio::spawn(poller.run(shutdown.clone()));
    let served = serve_http(config, Arc::new(handler), shutdown.clone()).await;

    shutdown.cancel();
    poller_handle.await?;
    served
}

async fn serve_http(
    config: &Config,
    handler: Arc<IngressHandler>,
    shutdown: CancellationToken,
) -> Result<(), BoxError> {
    let app = api::create_router(handler);
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("order-pipeline HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
