//! Process-wide logging: compact console output on stderr plus a rolling
//! file under `logs/`, initialized once at startup.

use crate::paths::{self, PathError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "docscrape.log";

/// Initialize the logging system.
///
/// Honors `RUST_LOG` when set; defaults to `info` for this crate otherwise.
/// Creating the log directory can fail on permissions, which is fatal.
pub fn init() -> Result<(), PathError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("docscrape=info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let log_dir = paths::logs_dir();
    paths::ensure_dir(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
