//! # Structured Logging Module
//!
//! Environment-aware structured logging for conformance runs. Each completed
//! check and each finished run is emitted as a structured `tracing` event.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::report::{CheckResult, Outcome, RunReport};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Selects the console event format; `RPC_CONFORMANCE_LOG_FORMAT=json` picks JSON lines
pub const LOG_FORMAT_ENV: &str = "RPC_CONFORMANCE_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Initialize structured logging with environment-specific configuration.
///
/// `RUST_LOG` wins when set; otherwise the level follows `RPC_CONFORMANCE_ENV`.
pub fn init_structured_logging() {
    let environment = get_environment();
    init_logging_with_level(get_log_level(&environment));
}

/// Initialize structured logging with `default_level` unless `RUST_LOG` is set.
/// The format comes from `RPC_CONFORMANCE_LOG_FORMAT`. Only the first call in a
/// process has any effect.
pub fn init_logging_with_level(default_level: &str) {
    init_logging(default_level, LogFormat::from_env());
}

/// Initialize structured logging with an explicit event format
pub fn init_logging(default_level: &str, format: LogFormat) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = || {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
        };

        let text_layer = (format == LogFormat::Text).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter())
        });
        let json_layer = (format == LogFormat::Json).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(filter())
        });

        let subscriber = tracing_subscriber::registry()
            .with(text_layer)
            .with(json_layer);

        // A global subscriber may already be installed by the embedding test or binary
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::debug!(default_level = %default_level, format = ?format, "Structured logging initialized");
    });
}

/// Replace the process panic hook with one that emits a `tracing` event.
///
/// The runner catches client and predicate panics, but the default hook still
/// prints them to stderr before they are caught. Processes that own their
/// output, like the CLI, install this once at startup.
pub fn route_panics_to_tracing() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_default();
        tracing::debug!(panic = %info, location = %location, "PANIC_CAPTURED");
    }));
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("RPC_CONFORMANCE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        "test" | "development" => "debug",
        _ => "debug",
    }
}

/// Log structured data for a completed check
pub fn log_check_outcome(result: &CheckResult) {
    let check = result.check();
    match result.outcome() {
        Outcome::Passed => tracing::info!(
            index = result.index(),
            operation = %check.operation(),
            label = %check.label(),
            outcome = %result.outcome(),
            elapsed_ms = result.elapsed_ms(),
            "CHECK_COMPLETED"
        ),
        Outcome::Failed | Outcome::Errored => tracing::warn!(
            index = result.index(),
            operation = %check.operation(),
            label = %check.label(),
            outcome = %result.outcome(),
            failure_detail = result.failure_detail(),
            elapsed_ms = result.elapsed_ms(),
            "CHECK_COMPLETED"
        ),
    }
}

/// Log structured data for a finished run
pub fn log_run_summary(report: &RunReport) {
    let summary = report.summary();
    tracing::info!(
        run_id = %report.run_id(),
        mode = ?report.mode(),
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        errored = summary.errored,
        duration_ms = report.duration_ms(),
        timestamp = %Utc::now().to_rfc3339(),
        "RUN_COMPLETED"
    );
}
