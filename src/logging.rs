//! Structured logging setup using `tracing-subscriber` and `tracing-appender`.
//!
//! Logs always go to stderr so prompts printed on stdout can be piped. With a
//! log directory, a daily-rotated JSON file layer is added. `RUST_LOG` wins
//! over the filters from [`LoggingConfig`].

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// File name prefix of rotated log files.
pub const LOG_FILE_PREFIX: &str = "pillarpost.log";

/// Keeps the JSON file writer flushing. Hold it until the process exits.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// `RUST_LOG` if set and valid, else `fallback`, else `warn`.
fn filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install stderr logging plus a JSON file layer writing to
/// `{logs_dir}/pillarpost.log.YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a global subscriber
/// is already installed.
pub fn init_file(logs_dir: &Path, config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir).map_err(|e| {
        anyhow::anyhow!(
            "failed to create logs directory {}: {e}",
            logs_dir.display()
        )
    })?;

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter_or(&config.file_filter))
        .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(LoggingGuard { _guard: guard })
}

/// Install stderr-only logging. Later calls keep the first subscriber.
pub fn init_cli(config: &LoggingConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or(&config.console_filter))
        .with_writer(std::io::stderr)
        .try_init();
}
