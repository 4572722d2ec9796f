//! File logging. The terminal belongs to the TUI, so `tracing` output goes
//! to `<data dir>/clinic-admin/clinic-admin.log`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "clinic-admin.log";

/// Errors that can occur while setting up logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The platform does not provide a data directory.
    #[error("could not determine data directory")]
    NoDataDir,

    /// The configured filter directive did not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber was already installed.
    #[error("could not install log subscriber: {0}")]
    Install(String),
}

/// Returns `<data dir>/clinic-admin`.
pub fn default_log_dir() -> Result<PathBuf, LoggingError> {
    let dir = dirs::data_dir().ok_or(LoggingError::NoDataDir)?;
    Ok(dir.join("clinic-admin"))
}

/// Builds the filter: `RUST_LOG` when set, otherwise `configured`.
pub fn build_filter(configured: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(configured)?),
    }
}

/// Installs a global subscriber writing to the log file in `dir`.
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// lifetime of the program.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn init(dir: &Path, filter: &str) -> Result<WorkerGuard, LoggingError> {
    fs::create_dir_all(dir)?;
    let filter = build_filter(filter)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_level() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(build_filter("info").is_ok());
    }

    #[test]
    fn accepts_target_directive() {
        assert!(build_filter("clinic_admin=debug,reqwest=warn").is_ok());
    }

    #[test]
    fn second_install_is_reported() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let _guard = init(first.path(), "info");
        let result = init(second.path(), "info");
        assert!(matches!(result, Err(LoggingError::Install(_))));
    }
}
