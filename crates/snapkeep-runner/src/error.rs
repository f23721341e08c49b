//! Errors that end a run

use snapkeep_domain::ArchiveCreationError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to take the backup directory lock
#[derive(Debug, Error)]
pub enum LockError {
    /// Another run holds the lock
    #[error(
        "Backup directory is locked by another run (lock file {}, holder {holder}); remove the lock file if no run is active",
        .path.display()
    )]
    Held {
        /// Lock file path
        path: PathBuf,
        /// Contents of the lock file (process id of the holder)
        holder: String,
    },

    /// The lock file could not be created
    ///
    /// The lock is taken before the artifact is created, so a missing or
    /// read-only backup directory is reported here.
    #[error("Failed to create lock file {}: {source}", .path.display())]
    Io {
        /// Lock file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Fatal run errors; the exit status is non-zero
#[derive(Debug, Error)]
pub enum RunError {
    /// The backup directory is in use
    #[error(transparent)]
    Lock(#[from] LockError),

    /// No artifact could be created
    #[error(transparent)]
    Archive(#[from] ArchiveCreationError),
}
