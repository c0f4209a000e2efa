use order_pipeline::{BoxError, Config, Mode, logger, server};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let mode: Mode = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("local")
        .parse()?;

    let config = Config::from_env()?;
    logger::init_logger_with_file(config.log_json, config.log_dir.as_deref());

    tracing::info!(
        mode = %mode,
        environment = %config.environment,
        "Starting order-pipeline"
    );

    if let Err(e) = server::run(mode, config).await {
        tracing::error!("Pipeline error: {e}");
        return Err(e);
    }

    Ok(())
}
