//! Snapkeep Domain Layer
//!
//! This crate contains the vocabulary shared by every other snapkeep crate:
//! how artifacts are named, which retention tiers exist, what a retention
//! policy says, which errors each stage of a run can produce, and the trait
//! interfaces behind which the archiving, upload and notification tools sit.
//!
//! ## Key Concepts
//!
//! - **Artifact**: one archived snapshot, identified by `<project>_<YYYYMMDD-HHMMSS>.<ext>`
//! - **Tier**: a retention bucket (daily, weekly, monthly)
//! - **Retention Policy**: per-tier quotas, fixed for a run
//! - **Completion Event**: the structured outcome sent at the end of a run
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - No I/O; tool-driving implementations live in snapkeep-runner

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod error;
pub mod event;
pub mod policy;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use artifact::{Artifact, ArtifactName, TIMESTAMP_FORMAT};
pub use error::{ArchiveCreationError, DeletionError, NotificationError, PublishError};
pub use event::{CompletionEvent, RunStatus};
pub use policy::RetentionPolicy;
pub use tier::Tier;
