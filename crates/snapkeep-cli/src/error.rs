//! Error types for the CLI application.

use snapkeep_janitor::JanitorError;
use snapkeep_runner::RunError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run aborted before or while creating the artifact
    #[error(transparent)]
    Run(#[from] RunError),

    /// Retention could not be planned
    #[error("Retention error: {0}")]
    Janitor(#[from] JanitorError),

    /// Notifier could not be built
    #[error("Notifier error: {0}")]
    Notifier(#[from] snapkeep_domain::NotificationError),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
