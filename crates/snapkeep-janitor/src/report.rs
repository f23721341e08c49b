//! Sweep reports

use snapkeep_domain::{DeletionError, Tier};
use std::collections::HashMap;

/// What a sweep over one project's backup directory did
///
/// Tracks artifacts retained per tier, artifacts deleted, and per-artifact
/// deletion failures.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Project the sweep ran for
    pub project: String,

    /// Artifacts retained per tier
    pub retained: HashMap<Tier, usize>,

    /// Artifacts removed from the store (or, in dry-run mode, that would be)
    pub deleted: Vec<String>,

    /// Deletions that failed
    pub failures: Vec<DeletionError>,

    /// Entries skipped because they do not name an artifact of this project
    pub ignored: usize,

    /// Whether deletions were only simulated
    pub dry_run: bool,
}

impl SweepReport {
    /// Create an empty report for `project`
    pub fn new(project: impl Into<String>, dry_run: bool) -> Self {
        Self {
            project: project.into(),
            dry_run,
            ..Default::default()
        }
    }

    /// Record an artifact retained by `tier`
    pub fn record_retained(&mut self, tier: Tier) {
        *self.retained.entry(tier).or_insert(0) += 1;
    }

    /// Record a deletion
    pub fn record_deletion(&mut self, file_name: impl Into<String>) {
        self.deleted.push(file_name.into());
    }

    /// Record a failed deletion
    pub fn record_failure(&mut self, error: DeletionError) {
        self.failures.push(error);
    }

    /// Artifacts retained by `tier`
    pub fn retained_in(&self, tier: Tier) -> usize {
        self.retained.get(&tier).copied().unwrap_or(0)
    }

    /// Artifacts retained across all tiers
    pub fn total_retained(&self) -> usize {
        self.retained.values().sum()
    }

    /// Artifacts deleted
    pub fn total_deleted(&self) -> usize {
        self.deleted.len()
    }

    /// Whether any deletion failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Generate a summary of the sweep
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Retention sweep for '{}'", self.project),
            "========================".to_string(),
        ];

        if self.dry_run {
            lines.push("Mode: dry run (nothing deleted)".to_string());
        }

        lines.push("Retained by tier:".to_string());
        for tier in Tier::ALL {
            lines.push(format!("  {}: {}", tier, self.retained_in(tier)));
        }
        lines.push(format!("  Total: {}", self.total_retained()));

        let verb = if self.dry_run { "Would delete" } else { "Deleted" };
        lines.push(format!("{}: {}", verb, self.total_deleted()));
        for name in &self.deleted {
            lines.push(format!("  - {}", name));
        }

        if self.has_failures() {
            lines.push(format!("Failed deletions: {}", self.failures.len()));
            for failure in &self.failures {
                lines.push(format!("  - {}", failure));
            }
        }

        if self.ignored > 0 {
            lines.push(format!("Ignored entries: {}", self.ignored));
        }

        lines.join("\n")
    }
}
