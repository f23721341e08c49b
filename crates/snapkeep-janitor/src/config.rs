//! Configuration for Janitor operations
//!
//! Defines the retention quotas and the dry-run switch.

use serde::{Deserialize, Serialize};
use snapkeep_domain::RetentionPolicy;

/// Configuration for the Janitor
///
/// # Examples
///
/// ```
/// use snapkeep_janitor::JanitorConfig;
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.policy.keep_daily, 7);
/// assert!(!config.dry_run);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Per-tier quotas
    #[serde(flatten)]
    pub policy: RetentionPolicy,

    /// Dry-run mode: classify and report without deleting anything
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

impl JanitorConfig {
    /// Configuration with the given policy
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            policy,
            dry_run: false,
        }
    }

    /// Toggle dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
