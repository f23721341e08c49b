//! Snapkeep Janitor
//!
//! Retention management for a project's backup directory.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Classification**: sorting a project's artifacts into daily, weekly and
//!   monthly tiers under a [`RetentionPolicy`](snapkeep_domain::RetentionPolicy)
//! - **Deletion**: removing every artifact no tier retains, best-effort
//! - **Reporting**: recording what was retained, deleted, and what failed
//!
//! ## Tiers
//!
//! | Tier | Quota | Bucket | Candidates |
//! |------|-------|--------|------------|
//! | **Daily** | `keep_daily` | one artifact each | all artifacts, newest first |
//! | **Weekly** | `keep_weekly` | ISO calendar week (UTC) | not retained by daily |
//! | **Monthly** | `keep_monthly` | calendar month (UTC) | not retained by daily or weekly |
//!
//! Artifacts whose names do not follow `<project>_<YYYYMMDD-HHMMSS>.<ext>`,
//! or that belong to another project, are ignored: never retained, never
//! deleted.
//!
//! # Usage
//!
//! ```
//! use snapkeep_domain::{Artifact, RetentionPolicy, Tier};
//! use snapkeep_janitor::classify;
//!
//! let artifacts = vec![
//!     Artifact::from_path("site_20240301-000000.zip").unwrap(),
//!     Artifact::from_path("site_20240201-000000.zip").unwrap(),
//!     Artifact::from_path("site_20240101-000000.zip").unwrap(),
//! ];
//!
//! let plan = classify(artifacts, &RetentionPolicy::new(1, 0, 1));
//! assert_eq!(plan.tier_of("site_20240301-000000.zip"), Some(Tier::Daily));
//! assert_eq!(plan.tier_of("site_20240201-000000.zip"), Some(Tier::Monthly));
//! assert_eq!(plan.deleted().len(), 1);
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [retention]
//! keep_daily = 7
//! keep_weekly = 4
//! keep_monthly = 3
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod janitor;
mod report;

pub use classifier::{classify, newest_first, RetentionPlan};
pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::Janitor;
pub use report::SweepReport;
