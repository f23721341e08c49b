//! Completion event emitted at the end of a run

use crate::ArtifactName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall outcome of a run as reported to the notification sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every stage succeeded
    Success,

    /// The artifact exists but a later stage failed
    Failure,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => f.write_str("success"),
            RunStatus::Failure => f.write_str("failure"),
        }
    }
}

/// Structured payload delivered to the notification sink
///
/// Serializes as:
///
/// ```json
/// {"project": "webapp", "date": "20240110", "timestamp": "2024-01-10T08:30:00Z", "status": "success"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Project name
    pub project: String,

    /// Snapshot date (`YYYYMMDD`)
    pub date: String,

    /// Snapshot creation time
    pub timestamp: DateTime<Utc>,

    /// Overall outcome
    pub status: RunStatus,

    /// Failure detail, when the status is `failure`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompletionEvent {
    /// Event for a successful run
    pub fn success(name: &ArtifactName) -> Self {
        Self::new(name, RunStatus::Success, None)
    }

    /// Event for a run whose later stages failed
    pub fn failure(name: &ArtifactName, error: impl Into<String>) -> Self {
        Self::new(name, RunStatus::Failure, Some(error.into()))
    }

    fn new(name: &ArtifactName, status: RunStatus, error: Option<String>) -> Self {
        Self {
            project: name.project().to_string(),
            date: name.date(),
            timestamp: name.created_at(),
            status,
            error,
        }
    }
}
