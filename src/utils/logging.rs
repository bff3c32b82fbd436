//! Logging configuration and setup
//!
//! This module provides logging initialization for the MyBot binaries:
//! stdout (plain or JSON), an optional daily-rolling log file and, when
//! `SENTRY_DSN` is set, Sentry crash reporting fed from tracing events.

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::Settings;
use crate::utils::errors::{MyBotError, Result};

/// Keeps the log file writer and the Sentry client alive; both flush on drop
#[must_use]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
    _sentry: Option<sentry::ClientInitGuard>,
}

/// Sentry client options, or `None` when no DSN is configured
pub fn sentry_options(settings: &Settings) -> Result<Option<sentry::ClientOptions>> {
    let Some(ref dsn) = settings.sentry_dsn else {
        return Ok(None);
    };
    let dsn = dsn
        .parse::<sentry::types::Dsn>()
        .map_err(|e| MyBotError::Config(format!("Invalid Sentry DSN: {}", e)))?;

    Ok(Some(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        sample_rate: settings.sentry_sample_rate,
        traces_sample_rate: settings.sentry_traces_rate(),
        ..Default::default()
    }))
}

/// Initialize logging based on configuration
///
/// The returned guard must be kept alive for the lifetime of the process.
pub fn init_logging(settings: &Settings) -> Result<LoggingGuard> {
    let filter = EnvFilter::try_new(settings.log_filter())
        .map_err(|e| MyBotError::Logging(e.to_string()))?;

    let stdout_layer = if settings.log_json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, file_guard) = match settings.log_file_dir {
        Some(ref dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "mybot.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let sentry_guard = sentry_options(settings)?.map(sentry::init);
    let sentry_layer = sentry_guard.as_ref().map(|_| sentry_tracing::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .with(sentry_layer)
        .try_init()
        .map_err(|e| MyBotError::Logging(e.to_string()))?;

    info!(
        level = settings.log_filter(),
        json = settings.log_json,
        file_dir = ?settings.log_file_dir,
        sentry = sentry_guard.is_some(),
        "Logging initialized"
    );
    Ok(LoggingGuard {
        _file: file_guard,
        _sentry: sentry_guard,
    })
}
