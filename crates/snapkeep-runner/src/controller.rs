//! Run controller: sequences one backup run
//!
//! ```text
//! START → LOCK → CREATE ─fail→ ABORT
//!                   │
//!                   └→ PUBLISH → CLASSIFY_AND_DELETE → NOTIFY → END
//! ```
//!
//! Only failing to lock or to create the artifact ends the run with an error.
//! Publishing, retention and notification are best-effort: their failures are
//! logged and recorded in the [`RunOutcome`], and the run carries on.
//!
//! Runs are synchronous and assume exclusive use of the backup directory;
//! [`RunController::execute`] enforces that with a [`DirectoryLock`].

use crate::error::RunError;
use crate::lock::DirectoryLock;
use crate::store::DirectoryStore;
use snapkeep_domain::traits::{Archiver, ArtifactStore, Clock, Notifier, Publisher, SystemClock};
use snapkeep_domain::{Artifact, CompletionEvent, NotificationError, PublishError, RunStatus};
use snapkeep_janitor::{Janitor, JanitorError, SweepReport};
use std::path::PathBuf;

/// Inputs of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Directory to snapshot
    pub project_dir: PathBuf,

    /// Directory holding the project's artifacts
    pub backup_dir: PathBuf,

    /// Remote destination identifier passed to the publisher
    pub destination: String,
}

/// What happened to the completion notification
#[derive(Debug)]
pub enum NotificationOutcome {
    /// Notification is switched off
    Disabled,

    /// The event was delivered
    Sent(RunStatus),

    /// Delivery failed
    Failed {
        /// Status the event carried
        status: RunStatus,
        /// Why delivery failed
        error: NotificationError,
    },
}

/// Result of a run whose artifact was created
#[derive(Debug)]
pub struct RunOutcome {
    /// The new artifact
    pub artifact: Artifact,

    /// Upload result
    pub publish: Result<(), PublishError>,

    /// Retention sweep result
    pub sweep: Result<SweepReport, JanitorError>,

    /// Notification result
    pub notification: NotificationOutcome,
}

impl RunOutcome {
    /// `Success` only when upload and every deletion succeeded
    pub fn status(&self) -> RunStatus {
        if self.failures().is_empty() {
            RunStatus::Success
        } else {
            RunStatus::Failure
        }
    }

    /// Descriptions of every recoverable failure before notification
    pub fn failures(&self) -> Vec<String> {
        let mut failures = Vec::new();

        if let Err(e) = &self.publish {
            failures.push(format!("upload failed: {e}"));
        }

        match &self.sweep {
            Ok(report) => {
                failures.extend(report.failures.iter().map(|e| e.to_string()));
            }
            Err(e) => failures.push(format!("retention failed: {e}")),
        }

        failures
    }

    /// Event describing this run
    pub fn completion_event(&self) -> CompletionEvent {
        let failures = self.failures();
        if failures.is_empty() {
            CompletionEvent::success(&self.artifact.name)
        } else {
            CompletionEvent::failure(&self.artifact.name, failures.join("; "))
        }
    }
}

/// Drives the stages of a run against injected capabilities
pub struct RunController<A, P, N, C = SystemClock> {
    archiver: A,
    publisher: P,
    notifier: Option<N>,
    janitor: Janitor,
    clock: C,
}

impl<A, P, N> RunController<A, P, N, SystemClock>
where
    A: Archiver,
    P: Publisher,
    N: Notifier,
{
    /// Controller using the system clock; pass `None` to disable notification
    pub fn new(archiver: A, publisher: P, notifier: Option<N>, janitor: Janitor) -> Self {
        Self {
            archiver,
            publisher,
            notifier,
            janitor,
            clock: SystemClock,
        }
    }
}

impl<A, P, N, C> RunController<A, P, N, C>
where
    A: Archiver,
    P: Publisher,
    N: Notifier,
    C: Clock,
{
    /// Replace the clock that timestamps new artifacts
    pub fn with_clock<C2: Clock>(self, clock: C2) -> RunController<A, P, N, C2> {
        RunController {
            archiver: self.archiver,
            publisher: self.publisher,
            notifier: self.notifier,
            janitor: self.janitor,
            clock,
        }
    }

    /// Janitor used for the retention stage
    pub fn janitor(&self) -> &Janitor {
        &self.janitor
    }

    /// Lock the backup directory and run against it
    ///
    /// The lock is released when this returns, whatever the outcome.
    pub fn execute(&self, request: &RunRequest) -> Result<RunOutcome, RunError> {
        let _lock = DirectoryLock::acquire(&request.backup_dir).map_err(|e| {
            tracing::error!(backup_dir = %request.backup_dir.display(), error = %e, "Cannot lock backup directory");
            e
        })?;

        let mut store = DirectoryStore::new(&request.backup_dir);
        self.run(request, &mut store)
    }

    /// Run every stage, with `store` as the backup directory's contents
    pub fn run<S: ArtifactStore>(
        &self,
        request: &RunRequest,
        store: &mut S,
    ) -> Result<RunOutcome, RunError> {
        tracing::info!(
            project_dir = %request.project_dir.display(),
            backup_dir = %request.backup_dir.display(),
            "Starting backup run"
        );

        let artifact = self.create(request)?;
        let publish = self.publish(&artifact, &request.destination);
        let sweep = self.sweep(store, &artifact);

        let mut outcome = RunOutcome {
            artifact,
            publish,
            sweep,
            notification: NotificationOutcome::Disabled,
        };
        outcome.notification = self.notify(&outcome);

        tracing::info!(
            artifact = %outcome.artifact.file_name,
            status = %outcome.status(),
            "Backup run finished"
        );

        Ok(outcome)
    }

    fn create(&self, request: &RunRequest) -> Result<Artifact, RunError> {
        let created_at = self.clock.now();

        match self
            .archiver
            .create(&request.project_dir, &request.backup_dir, created_at)
        {
            Ok(artifact) => {
                tracing::info!(artifact = %artifact.location.display(), "Backup created");
                Ok(artifact)
            }
            Err(e) => {
                tracing::error!(
                    project_dir = %request.project_dir.display(),
                    error = %e,
                    "Error creating backup; aborting run"
                );
                Err(RunError::Archive(e))
            }
        }
    }

    fn publish(&self, artifact: &Artifact, destination: &str) -> Result<(), PublishError> {
        let result = self.publisher.publish(&artifact.location, destination);

        match &result {
            Ok(()) => tracing::info!(
                artifact = %artifact.file_name,
                destination,
                "Backup uploaded"
            ),
            Err(e) => tracing::error!(
                artifact = %artifact.file_name,
                destination,
                error = %e,
                "Error uploading backup"
            ),
        }

        result
    }

    fn sweep<S: ArtifactStore>(
        &self,
        store: &mut S,
        artifact: &Artifact,
    ) -> Result<SweepReport, JanitorError> {
        let result = self.janitor.sweep(store, artifact.project());

        match &result {
            Ok(report) if report.has_failures() => tracing::warn!(
                failed = report.failures.len(),
                "Some old backups could not be deleted"
            ),
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "Error deleting old backups"),
        }

        result
    }

    fn notify(&self, outcome: &RunOutcome) -> NotificationOutcome {
        let Some(notifier) = &self.notifier else {
            tracing::info!("Notification disabled");
            return NotificationOutcome::Disabled;
        };

        let event = outcome.completion_event();
        match notifier.notify(&event) {
            Ok(()) => {
                tracing::info!(status = %event.status, "Notification sent");
                NotificationOutcome::Sent(event.status)
            }
            Err(error) => {
                tracing::error!(error = %error, "Error sending notification");
                NotificationOutcome::Failed {
                    status: event.status,
                    error,
                }
            }
        }
    }
}
