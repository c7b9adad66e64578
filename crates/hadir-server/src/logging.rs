//! Environment-aware tracing setup.
//!
//! Development gets pretty, colored stdout output. Production adds a daily
//! rolling JSON log file under the hadir log directory and switches stdout
//! to a compact, ANSI-free format that journald can ingest cleanly.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from
//! `HADIR_LOG_LEVEL` (default `info`).

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Non-blocking writers stop flushing once their guard drops, so the guards
// live for the whole process.
static WRITER_GUARDS: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the log filter cannot be parsed.
pub fn init(is_production: bool) -> anyhow::Result<()> {
    let fallback = std::env::var("HADIR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&fallback))?;

    if is_production {
        init_production(filter);
    } else {
        init_development(filter);
    }
    Ok(())
}

fn init_production(filter: EnvFilter) {
    let log_dir = log_directory();
    if std::fs::create_dir_all(&log_dir).is_err() {
        // Fall back to stdout-only logging; losing the file sink should not
        // stop attendance processing.
        init_development(filter);
        return;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "hadir");
    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    let _ = WRITER_GUARDS.set(vec![file_guard, stdout_guard]);
}

fn init_development(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .init();
}

/// Log directory: `/var/log/hadir` on Linux servers, the platform data dir
/// during development elsewhere.
fn log_directory() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/var/log/hadir")
    }
    #[cfg(not(target_os = "linux"))]
    {
        directories::ProjectDirs::from("", "", "hadir")
            .map(|dirs| dirs.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("./logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_is_valid_path() {
        assert!(!log_directory().as_os_str().is_empty());
    }
}
