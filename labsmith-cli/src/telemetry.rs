//! Logging setup
//!
//! Builds the subscriber for one run: a console layer for warnings (or debug
//! output with `--verbose`) and a file layer that keeps everything from DEBUG
//! up. The subscriber is scoped to the returned [`Telemetry`] handle rather
//! than installed globally.

use labsmith_core::{Error, ErrorKind, Result};
use std::path::Path;
use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Name of the persistent log file
pub const LOG_FILE: &str = "labsmith.log";

/// Live logging for the current thread. Dropping it (or calling
/// [`Telemetry::finish`]) uninstalls the subscriber and flushes the log file.
pub struct Telemetry {
    // Field order matters: the subscriber goes away before the file writer.
    _subscriber: DefaultGuard,
    _file_writer: WorkerGuard,
}

impl Telemetry {
    pub fn init(log_dir: &Path, verbose: bool) -> Result<Self> {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(LOG_FILE)
            .build(log_dir)
            .map_err(|e| {
                Error::new(ErrorKind::IoFailed, "failed to open log file")
                    .with_operation("telemetry::init")
                    .with_context("path", log_dir.join(LOG_FILE).display().to_string())
                    .set_source(e)
            })?;
        let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

        let console_level = if verbose { "debug" } else { "warn" };
        let console_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(console_level));

        let console = fmt::layer()
            .without_time()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_filter);

        let file = fmt::layer()
            .with_ansi(false)
            .with_writer(file_writer)
            .with_filter(LevelFilter::DEBUG);

        let subscriber = Registry::default().with(console).with(file);

        Ok(Self {
            _subscriber: tracing::subscriber::set_default(subscriber),
            _file_writer: file_guard,
        })
    }

    /// End the logging session, flushing buffered file output.
    pub fn finish(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_events_reach_log_file() {
        let dir = tempdir().unwrap();
        let telemetry = Telemetry::init(dir.path(), false).unwrap();
        tracing::debug!("debug line for the file");
        tracing::info!(step = "analysis", "info line for the file");
        telemetry.finish();

        let log = fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert!(log.contains("debug line for the file"));
        assert!(log.contains("info line for the file"));
        assert!(log.contains("step="));
    }

    #[test]
    fn test_subscriber_is_scoped_to_handle() {
        let dir = tempdir().unwrap();
        let telemetry = Telemetry::init(dir.path(), true).unwrap();
        telemetry.finish();

        tracing::info!("emitted after finish");
        let log = fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert!(!log.contains("emitted after finish"));
    }
}
