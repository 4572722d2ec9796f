use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Errors that can stop the application before or while the TUI runs.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An I/O error occurred (terminal, event reading, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File logging could not be set up.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}
