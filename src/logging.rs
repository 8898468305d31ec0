use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_DIR_ENV: &str = "CONNECTOR_LOG_DIR";
const DEFAULT_FILTER: &str = "cortex_sentinel_connector=info,cortex_sentinel=info";

/// Initializes logging with console output and a daily-rotated JSON file.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// life of the process.
pub fn init_logging() -> WorkerGuard {
    let log_dir = std::env::var(LOG_DIR_ENV).unwrap_or_else(|_| "logs".to_string());
    let _ = fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, "connector.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
