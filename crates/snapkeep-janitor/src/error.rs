//! Error types for Janitor operations

use thiserror::Error;

/// Errors that abort a sweep before any deletion happens
///
/// Failures to delete individual artifacts are not errors of the sweep; they
/// are collected in the [`SweepReport`](crate::SweepReport).
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Listing the artifact store failed
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
