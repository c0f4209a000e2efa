//! Logging Infrastructure
//!
//! `RUST_LOG` filtering, optional JSON lines and optional daily rolling files.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "order_pipeline=info,tower_http=info";
const LOG_FILE_PREFIX: &str = "order-pipeline";

/// Initialize the logger with optional JSON formatting and file output
///
/// A `log_dir` that does not exist is ignored and logs go to stdout.
pub fn init_logger_with_file(json: bool, log_dir: Option<&str>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    let appender = log_dir
        .map(Path::new)
        .filter(|path| path.is_dir())
        .map(|path| tracing_appender::rolling::daily(path, LOG_FILE_PREFIX));

    match (json, appender) {
        (true, Some(appender)) => subscriber.json().with_writer(appender).init(),
        (true, None) => subscriber.json().init(),
        (false, Some(appender)) => subscriber.with_ansi(false).with_writer(appender).init(),
        (false, None) => subscriber.init(),
    }
}
