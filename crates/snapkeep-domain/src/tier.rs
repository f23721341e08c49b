//! Tier module - retention buckets for backup artifacts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Retention tier an artifact can be kept under
///
/// Tiers are evaluated in order over the same population:
/// - Daily: the most recent snapshots, unconditionally
/// - Weekly: one snapshot per ISO calendar week
/// - Monthly: one snapshot per calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Most recent snapshots
    Daily,

    /// One snapshot per calendar week
    Weekly,

    /// One snapshot per calendar month
    Monthly,
}

impl Tier {
    /// All tiers in evaluation order
    pub const ALL: [Tier; 3] = [Tier::Daily, Tier::Weekly, Tier::Monthly];

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Daily => "daily",
            Tier::Weekly => "weekly",
            Tier::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
