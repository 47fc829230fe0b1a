//! Structured logger.
//!
//! One initializer for the whole backend: console output always, plus a
//! daily-rolling NDJSON file when a log directory is configured. Level
//! control comes from the environment, falling back to the given default.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Rolled file names look like `vinforge.log.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "vinforge.log";

/// Initialize the global logger.
///
/// Passing a `log_dir` adds the JSON file layer; `None` keeps the service
/// console-only. Calling this twice is a no-op, not a panic, so tests and
/// subcommands can all route through it.
pub fn init_logger(default_level: &str, log_dir: Option<&str>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Option<Layer> is itself a Layer, so the file output simply
    // disappears from the stack when no directory is configured.
    let file_layer = log_dir.map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer().json().with_writer(appender).with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stdout).with_target(false))
        .with(file_layer)
        .try_init();
}
