//! Core Janitor implementation: classify a project's artifacts and delete
//! whatever no tier retains

use crate::{classify, JanitorConfig, JanitorError, RetentionPlan, SweepReport};
use snapkeep_domain::traits::ArtifactStore;
use snapkeep_domain::Artifact;
use std::path::Path;

/// Janitor for one backup directory's retention
///
/// Responsible for:
/// - Collecting the artifacts of a project from an [`ArtifactStore`]
/// - Classifying them into daily/weekly/monthly tiers
/// - Deleting the artifacts no tier retains, best-effort
///
/// # Examples
///
/// ```no_run
/// use snapkeep_janitor::{Janitor, JanitorConfig};
/// # use snapkeep_domain::traits::ArtifactStore;
///
/// # fn run<S: ArtifactStore>(mut store: S) -> Result<(), Box<dyn std::error::Error>> {
/// let janitor = Janitor::new(JanitorConfig::default());
/// let report = janitor.sweep(&mut store, "webapp")?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Janitor {
    config: JanitorConfig,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self { config }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Configuration in use
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Classify the store's artifacts for `project` without deleting anything
    pub fn plan<S: ArtifactStore>(
        &self,
        store: &S,
        project: &str,
    ) -> Result<RetentionPlan, JanitorError> {
        let (artifacts, _) = self.collect(store, project)?;
        Ok(classify(artifacts, &self.config.policy))
    }

    /// Classify and delete
    ///
    /// Deletion is best-effort: a failure is logged and recorded in the
    /// report, and the remaining deletions still run. Only a failure to list
    /// the store aborts the sweep.
    pub fn sweep<S: ArtifactStore>(
        &self,
        store: &mut S,
        project: &str,
    ) -> Result<SweepReport, JanitorError> {
        let (artifacts, ignored) = self.collect(store, project)?;
        let plan = classify(artifacts, &self.config.policy);

        let mut report = SweepReport::new(project, self.config.dry_run);
        report.ignored = ignored;

        for (artifact, tier) in plan.retained() {
            tracing::debug!(artifact = %artifact.file_name, %tier, "Retaining backup");
            report.record_retained(*tier);
        }

        if self.config.dry_run {
            for artifact in plan.deleted() {
                tracing::info!(artifact = %artifact.file_name, "DRY RUN: Would delete old backup");
                report.record_deletion(artifact.file_name.clone());
            }
            return Ok(report);
        }

        for artifact in plan.deleted() {
            match store.delete(&artifact.file_name) {
                Ok(()) => {
                    tracing::info!(artifact = %artifact.file_name, "Deleted old backup");
                    report.record_deletion(artifact.file_name.clone());
                }
                Err(e) => {
                    tracing::error!(artifact = %artifact.file_name, error = %e, "Failed to delete old backup");
                    report.record_failure(e);
                }
            }
        }

        tracing::info!(
            "Sweep completed for {}: {} retained, {} deleted, {} failed",
            project,
            report.total_retained(),
            report.total_deleted(),
            report.failures.len()
        );

        Ok(report)
    }

    /// Artifacts of `project` in the store, plus the number of entries skipped
    fn collect<S: ArtifactStore>(
        &self,
        store: &S,
        project: &str,
    ) -> Result<(Vec<Artifact>, usize), JanitorError> {
        if project.is_empty() {
            return Err(JanitorError::Config("project name must not be empty".to_string()));
        }

        let entries = store
            .list()
            .map_err(|e| JanitorError::Store(e.to_string()))?;

        let mut artifacts = Vec::with_capacity(entries.len());
        let mut ignored = 0;

        for entry in entries {
            match Artifact::from_path(Path::new(&entry)) {
                Some(artifact) if artifact.project() == project => artifacts.push(artifact),
                _ => {
                    tracing::trace!(entry = %entry, "Ignoring entry outside retention");
                    ignored += 1;
                }
            }
        }

        Ok((artifacts, ignored))
    }
}
