//! Retention policy - per-tier quotas for one run

use crate::Tier;
use serde::{Deserialize, Serialize};

/// How many artifacts each tier retains
///
/// A policy is fixed for the duration of a run. A quota of zero means the
/// tier retains nothing.
///
/// # Examples
///
/// ```
/// use snapkeep_domain::{RetentionPolicy, Tier};
///
/// let policy = RetentionPolicy::default();
/// assert_eq!(policy.quota(Tier::Daily), 7);
/// assert_eq!(policy.quota(Tier::Weekly), 4);
/// assert_eq!(policy.quota(Tier::Monthly), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Most recent artifacts kept unconditionally
    #[serde(default = "default_keep_daily")]
    pub keep_daily: usize,

    /// Calendar weeks kept (one artifact each)
    #[serde(default = "default_keep_weekly")]
    pub keep_weekly: usize,

    /// Calendar months kept (one artifact each)
    #[serde(default = "default_keep_monthly")]
    pub keep_monthly: usize,
}

fn default_keep_daily() -> usize {
    7
}

fn default_keep_weekly() -> usize {
    4
}

fn default_keep_monthly() -> usize {
    3
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            keep_daily: default_keep_daily(),
            keep_weekly: default_keep_weekly(),
            keep_monthly: default_keep_monthly(),
        }
    }
}

impl RetentionPolicy {
    /// Create a policy from explicit quotas
    pub fn new(keep_daily: usize, keep_weekly: usize, keep_monthly: usize) -> Self {
        Self {
            keep_daily,
            keep_weekly,
            keep_monthly,
        }
    }

    /// Quota of a single tier
    pub fn quota(&self, tier: Tier) -> usize {
        match tier {
            Tier::Daily => self.keep_daily,
            Tier::Weekly => self.keep_weekly,
            Tier::Monthly => self.keep_monthly,
        }
    }

    /// Upper bound on the number of artifacts this policy can retain
    ///
    /// Saturates at `usize::MAX` for unbounded quotas.
    pub fn capacity(&self) -> usize {
        self.keep_daily
            .saturating_add(self.keep_weekly)
            .saturating_add(self.keep_monthly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let policy: RetentionPolicy = serde_json::from_str(r#"{"keep_daily": 14}"#).unwrap();
        assert_eq!(policy, RetentionPolicy::new(14, 4, 3));
    }

    #[test]
    fn test_capacity() {
        assert_eq!(RetentionPolicy::default().capacity(), 14);
        assert_eq!(RetentionPolicy::new(0, 0, 0).capacity(), 0);
    }

    #[test]
    fn test_capacity_saturates() {
        assert_eq!(RetentionPolicy::new(usize::MAX, 1, 0).capacity(), usize::MAX);
        assert_eq!(
            RetentionPolicy::new(usize::MAX, usize::MAX, usize::MAX).capacity(),
            usize::MAX
        );
    }
}
