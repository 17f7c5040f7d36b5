//! Structured logging configuration
//!
//! Provides logging with:
//! - JSON or pretty formatting
//! - Console (stderr), file or combined output
//! - `RUST_LOG` taking precedence over the configured level
//!
//! Console output always goes to stderr: the engine owns stdout.

use crate::config::Config;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use uuid::Uuid;

/// Initialize the logging system based on configuration.
///
/// The returned guard flushes file output when dropped and must be kept
/// alive until the process is about to exit.
pub fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let log_level = &config.logging.level;
    let log_format = config.logging.format.as_str();

    match config.logging.output.as_str() {
        "file" | "both" => {
            let combined = config.logging.output == "both";
            match file_appender(&config.paths.log_directory) {
                Ok(appender) => {
                    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                    init_file_logging(env_filter(log_level), log_format, non_blocking, combined);
                    Some(guard)
                }
                Err(e) => {
                    init_console_logging(env_filter(log_level), log_format);
                    tracing::warn!(
                        error = %e,
                        log_directory = %config.paths.log_directory.display(),
                        "Could not open log file, logging to stderr"
                    );
                    None
                }
            }
        }
        _ => {
            init_console_logging(env_filter(log_level), log_format);
            None
        }
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("ocsight.log")
        .build(dir)
}

fn init_console_logging(filter: EnvFilter, format: &str) {
    let subscriber = tracing_subscriber::registry().with(filter);

    let result = match format {
        "json" => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true),
            )
            .try_init(),
        _ => subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_ansi(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

fn init_file_logging(
    filter: EnvFilter,
    format: &str,
    writer: tracing_appender::non_blocking::NonBlocking,
    also_console: bool,
) {
    let subscriber = tracing_subscriber::registry().with(filter);

    let result = match format {
        "json" => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .with(also_console.then(|| fmt::layer().json().with_writer(std::io::stderr)))
            .try_init(),
        _ => subscriber
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .with(also_console.then(|| fmt::layer().with_writer(std::io::stderr)))
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

/// Identifier attached to every log line of one invocation
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create the span wrapping one launcher invocation
#[macro_export]
macro_rules! invocation_span {
    ($command:expr) => {
        tracing::info_span!(
            "invocation",
            run_id = %$crate::logging::new_run_id(),
            command = %$command
        )
    };
}
