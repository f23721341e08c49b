//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the run logic and the tools it
//! drives. Implementations that spawn processes or talk to the network live in
//! snapkeep-runner; tests substitute fakes.

use crate::{
    Artifact, ArchiveCreationError, CompletionEvent, DeletionError, NotificationError,
    PublishError,
};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Creates a snapshot artifact of a source directory
pub trait Archiver {
    /// Snapshot `source_dir` into `backup_dir`, naming it after `created_at`
    ///
    /// Must leave nothing behind in `backup_dir` on failure.
    fn create(
        &self,
        source_dir: &Path,
        backup_dir: &Path,
        created_at: DateTime<Utc>,
    ) -> Result<Artifact, ArchiveCreationError>;
}

/// Uploads an artifact to a remote destination
///
/// Implementations make a single attempt; retrying is layered on top.
pub trait Publisher {
    /// Transmit `artifact` to `destination`
    fn publish(&self, artifact: &Path, destination: &str) -> Result<(), PublishError>;
}

/// Delivers the completion event of a run
pub trait Notifier {
    /// Emit `event` to the configured sink
    fn notify(&self, event: &CompletionEvent) -> Result<(), NotificationError>;
}

/// The persistent set of artifact files for a project
///
/// Implemented over a directory by snapkeep-runner
pub trait ArtifactStore {
    /// Error type for listing entries
    type Error: std::fmt::Display;

    /// File names of every entry in the store, conforming or not
    fn list(&self) -> Result<Vec<String>, Self::Error>;

    /// Remove one entry
    fn delete(&mut self, file_name: &str) -> Result<(), DeletionError>;
}

/// Source of the current time
pub trait Clock {
    /// Current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
