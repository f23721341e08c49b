//! Error taxonomy for the stages of a backup run
//!
//! Only [`ArchiveCreationError`] is fatal to a run. The others are recorded at
//! their stage boundary and the run moves on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Creating the snapshot archive failed; the run is aborted
#[derive(Debug, Error)]
pub enum ArchiveCreationError {
    /// Source directory cannot be read
    #[error("Source directory {} is unreadable: {source}", .path.display())]
    SourceUnreadable {
        /// Source directory
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Source directory has no usable base name to derive the project from
    #[error("Cannot derive a project name from {}", .0.display())]
    NoProjectName(PathBuf),

    /// Backup directory does not accept new files
    #[error("Backup directory {} is not writable: {source}", .path.display())]
    DestinationNotWritable {
        /// Backup directory
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The archiving tool could not produce the archive
    #[error("Archiver failed: {0}")]
    Archiver(String),

    /// An artifact with the same name is already present
    #[error("Artifact {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    /// Moving the finished archive into place failed
    #[error("I/O error while finalizing artifact: {0}")]
    Io(#[from] io::Error),
}

/// Uploading an artifact failed
#[derive(Debug, Error)]
pub enum PublishError {
    /// The artifact to upload is missing
    #[error("Artifact {} does not exist", .0.display())]
    MissingArtifact(PathBuf),

    /// The transport could not be started
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        /// Program that was launched
        program: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The transport ran and reported failure
    #[error("{program} exited with {status}: {diagnostic}")]
    Transport {
        /// Program that was launched
        program: String,
        /// Exit status as reported by the OS
        status: String,
        /// Diagnostic output of the transport
        diagnostic: String,
    },
}

/// Removing one artifact failed; other deletions continue
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to delete {file_name}: {reason}")]
pub struct DeletionError {
    /// File name within the backup directory
    pub file_name: String,

    /// Why the deletion failed
    pub reason: String,
}

impl DeletionError {
    /// Create a deletion error for `file_name`
    pub fn new(file_name: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            file_name: file_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Delivering the completion event failed; never affects the exit status
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Payload could not be encoded
    #[error("Failed to encode notification payload: {0}")]
    Encode(String),

    /// Request did not reach the sink
    #[error("Notification request failed: {0}")]
    Transport(String),

    /// Sink answered with a non-success status
    #[error("Notification sink rejected the event with status {0}")]
    Rejected(u16),
}
