//! Retention classification: which artifacts each tier keeps
//!
//! Classification is a strict partition. Tiers run in order (daily, weekly,
//! monthly), and each one only sees artifacts that no earlier tier retained.
//! Whatever no tier retains is deleted. An artifact is therefore either
//! retained by exactly one tier or deleted, never both.
//!
//! ## Bucketing
//!
//! - Weekly buckets are ISO-8601 calendar weeks in UTC (Monday to Sunday),
//!   keyed by ISO year and week number.
//! - Monthly buckets are calendar months in UTC.
//!
//! Within a bucket the newest remaining artifact represents it. Buckets are
//! taken newest first until the tier's quota is used up.

use chrono::{DateTime, Datelike, Utc};
use snapkeep_domain::{Artifact, RetentionPolicy, Tier};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Outcome of classifying one project's artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPlan {
    retained: Vec<(Artifact, Tier)>,
    deleted: Vec<Artifact>,
}

impl RetentionPlan {
    /// Artifacts kept, newest first, with the tier that kept them
    pub fn retained(&self) -> &[(Artifact, Tier)] {
        &self.retained
    }

    /// Artifacts no tier kept, newest first
    pub fn deleted(&self) -> &[Artifact] {
        &self.deleted
    }

    /// Tier that retains `file_name`, if any
    pub fn tier_of(&self, file_name: &str) -> Option<Tier> {
        self.retained
            .iter()
            .find(|(artifact, _)| artifact.file_name == file_name)
            .map(|(_, tier)| *tier)
    }

    /// Number of artifacts retained by `tier`
    pub fn retained_in(&self, tier: Tier) -> usize {
        self.retained.iter().filter(|(_, t)| *t == tier).count()
    }

    /// Total number of classified artifacts
    pub fn len(&self) -> usize {
        self.retained.len() + self.deleted.len()
    }

    /// Whether there was nothing to classify
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Newest first; identical timestamps fall back to the file name so the
/// order never depends on directory listing order.
pub fn newest_first(a: &Artifact, b: &Artifact) -> Ordering {
    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| a.file_name.cmp(&b.file_name))
}

/// Classify `artifacts` under `policy`
///
/// The input is expected to belong to a single project; callers filter
/// foreign and non-conforming entries beforehand.
///
/// # Examples
///
/// ```
/// use snapkeep_domain::{Artifact, RetentionPolicy};
/// use snapkeep_janitor::classify;
///
/// let artifacts: Vec<Artifact> = (1..=10)
///     .map(|day| Artifact::from_path(format!("p_202401{day:02}-000000.zip")).unwrap())
///     .collect();
///
/// let plan = classify(artifacts, &RetentionPolicy::new(7, 0, 0));
/// assert_eq!(plan.retained().len(), 7);
/// assert_eq!(plan.deleted().len(), 3);
/// ```
pub fn classify(mut artifacts: Vec<Artifact>, policy: &RetentionPolicy) -> RetentionPlan {
    artifacts.sort_by(newest_first);

    let mut retained = Vec::with_capacity(policy.capacity().min(artifacts.len()));

    let remainder = artifacts.split_off(policy.keep_daily.min(artifacts.len()));
    retained.extend(artifacts.into_iter().map(|artifact| (artifact, Tier::Daily)));

    let remainder = keep_one_per_bucket(
        remainder,
        policy.keep_weekly,
        Tier::Weekly,
        week_bucket,
        &mut retained,
    );
    let deleted = keep_one_per_bucket(
        remainder,
        policy.keep_monthly,
        Tier::Monthly,
        month_bucket,
        &mut retained,
    );

    retained.sort_by(|(a, _), (b, _)| newest_first(a, b));

    RetentionPlan { retained, deleted }
}

/// Walk `candidates` (sorted newest first) and keep the first artifact of each
/// new bucket until `quota` buckets are taken. Returns the artifacts not kept,
/// still sorted.
fn keep_one_per_bucket(
    candidates: Vec<Artifact>,
    quota: usize,
    tier: Tier,
    bucket: fn(DateTime<Utc>) -> (i32, u32),
    retained: &mut Vec<(Artifact, Tier)>,
) -> Vec<Artifact> {
    let mut taken = HashSet::with_capacity(quota.min(candidates.len()));
    let mut rest = Vec::with_capacity(candidates.len());

    for artifact in candidates {
        let key = bucket(artifact.created_at());
        if taken.len() < quota && taken.insert(key) {
            retained.push((artifact, tier));
        } else {
            rest.push(artifact);
        }
    }

    rest
}

fn week_bucket(at: DateTime<Utc>) -> (i32, u32) {
    let week = at.iso_week();
    (week.year(), week.week())
}

fn month_bucket(at: DateTime<Utc>) -> (i32, u32) {
    (at.year(), at.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use snapkeep_domain::ArtifactName;

    fn artifact_at(project: &str, at: DateTime<Utc>) -> Artifact {
        let file_name = ArtifactName::new(project, at).file_name("zip");
        Artifact::from_path(file_name).unwrap()
    }

    fn daily(project: &str, first: DateTime<Utc>, days: i64) -> Vec<Artifact> {
        (0..days)
            .map(|d| artifact_at(project, first + Duration::days(d)))
            .collect()
    }

    fn names(artifacts: &[Artifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.file_name.as_str()).collect()
    }

    fn jan(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_input_is_noop() {
        let plan = classify(Vec::new(), &RetentionPolicy::default());
        assert!(plan.is_empty());
        assert!(plan.deleted().is_empty());
    }

    #[test]
    fn test_ten_daily_snapshots_keep_seven() {
        let plan = classify(daily("p", jan(1), 10), &RetentionPolicy::new(7, 0, 0));

        let kept: Vec<&str> = plan.retained().iter().map(|(a, _)| a.file_name.as_str()).collect();
        assert_eq!(kept.len(), 7);
        assert_eq!(kept[0], "p_20240110-000000.zip");
        assert_eq!(kept[6], "p_20240104-000000.zip");
        assert_eq!(plan.retained_in(Tier::Daily), 7);

        assert_eq!(
            names(plan.deleted()),
            vec![
                "p_20240103-000000.zip",
                "p_20240102-000000.zip",
                "p_20240101-000000.zip",
            ]
        );
    }

    #[test]
    fn test_older_daily_candidates_rescued_by_higher_tiers() {
        // 2024-01-01 is a Monday, so Jan 1-3 share ISO week 1 and January.
        let plan = classify(daily("p", jan(1), 10), &RetentionPolicy::default());

        assert_eq!(plan.tier_of("p_20240103-000000.zip"), Some(Tier::Weekly));
        assert_eq!(plan.tier_of("p_20240102-000000.zip"), Some(Tier::Monthly));
        assert_eq!(names(plan.deleted()), vec!["p_20240101-000000.zip"]);
    }

    #[test]
    fn test_all_quotas_zero_deletes_everything() {
        let plan = classify(daily("p", jan(1), 5), &RetentionPolicy::new(0, 0, 0));
        assert!(plan.retained().is_empty());
        assert_eq!(plan.deleted().len(), 5);
    }

    #[test]
    fn test_fewer_artifacts_than_daily_quota() {
        let plan = classify(daily("p", jan(1), 3), &RetentionPolicy::new(7, 0, 0));
        assert_eq!(plan.retained().len(), 3);
        assert!(plan.deleted().is_empty());
    }

    #[test]
    fn test_weekly_keeps_newest_of_each_week() {
        // Jan 1..=21 spans ISO weeks 1, 2 and 3 of 2024.
        let plan = classify(daily("p", jan(1), 21), &RetentionPolicy::new(0, 2, 0));

        assert_eq!(plan.retained_in(Tier::Weekly), 2);
        assert_eq!(plan.tier_of("p_20240121-000000.zip"), Some(Tier::Weekly));
        assert_eq!(plan.tier_of("p_20240114-000000.zip"), Some(Tier::Weekly));
        assert_eq!(plan.tier_of("p_20240107-000000.zip"), None);
        assert_eq!(plan.deleted().len(), 19);
    }

    #[test]
    fn test_weekly_buckets_follow_iso_weeks_across_year_end() {
        // 2024-12-30 (Mon) and 2025-01-01 (Wed) are both in ISO week 2025-W01.
        let a = artifact_at("p", Utc.with_ymd_and_hms(2024, 12, 30, 0, 0, 0).unwrap());
        let b = artifact_at("p", Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let c = artifact_at("p", Utc.with_ymd_and_hms(2024, 12, 29, 0, 0, 0).unwrap());

        let plan = classify(vec![a, b, c], &RetentionPolicy::new(0, 5, 0));

        assert_eq!(plan.tier_of("p_20250101-000000.zip"), Some(Tier::Weekly));
        assert_eq!(plan.tier_of("p_20241229-000000.zip"), Some(Tier::Weekly));
        assert_eq!(names(plan.deleted()), vec!["p_20241230-000000.zip"]);
    }

    #[test]
    fn test_monthly_keeps_newest_of_each_month() {
        let artifacts = vec![
            artifact_at("p", Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()),
            artifact_at("p", Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()),
            artifact_at("p", Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap()),
            artifact_at("p", Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()),
            artifact_at("p", Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap()),
        ];

        let plan = classify(artifacts, &RetentionPolicy::new(0, 0, 3));

        assert_eq!(plan.tier_of("p_20240315-000000.zip"), Some(Tier::Monthly));
        assert_eq!(plan.tier_of("p_20240220-000000.zip"), Some(Tier::Monthly));
        assert_eq!(plan.tier_of("p_20240131-235959.zip"), Some(Tier::Monthly));
        assert_eq!(
            names(plan.deleted()),
            vec!["p_20240302-000000.zip", "p_20231231-000000.zip"]
        );
    }

    #[test]
    fn test_daily_retained_never_counted_by_weekly() {
        // All in one week: daily keeps two, weekly takes the next one as the
        // week's representative from the remainder.
        let plan = classify(daily("p", jan(1), 5), &RetentionPolicy::new(2, 1, 0));

        assert_eq!(plan.tier_of("p_20240105-000000.zip"), Some(Tier::Daily));
        assert_eq!(plan.tier_of("p_20240104-000000.zip"), Some(Tier::Daily));
        assert_eq!(plan.tier_of("p_20240103-000000.zip"), Some(Tier::Weekly));
        assert_eq!(plan.deleted().len(), 2);
    }

    #[test]
    fn test_identical_timestamps_ordered_by_name() {
        let at = jan(5);
        let zip = Artifact::from_path(ArtifactName::new("p", at).file_name("zip")).unwrap();
        let tar = Artifact::from_path(ArtifactName::new("p", at).file_name("tar")).unwrap();

        let plan = classify(vec![zip.clone(), tar.clone()], &RetentionPolicy::new(1, 0, 0));
        assert_eq!(plan.retained()[0].0, tar);
        assert_eq!(plan.deleted(), &[zip.clone()][..]);

        let again = classify(vec![tar, zip], &RetentionPolicy::new(1, 0, 0));
        assert_eq!(plan, again);
    }

    #[test]
    fn test_unbounded_quotas_do_not_overflow() {
        let unbounded = RetentionPolicy::new(usize::MAX, usize::MAX, usize::MAX);
        let plan = classify(daily("p", jan(1), 3), &unbounded);
        assert_eq!(plan.retained_in(Tier::Daily), 3);
        assert!(plan.deleted().is_empty());

        // Jan 1-3 2024 share one ISO week, so weekly keeps just one
        let plan = classify(daily("p", jan(1), 3), &RetentionPolicy::new(1, usize::MAX, 0));
        assert_eq!(plan.retained_in(Tier::Weekly), 1);
        assert_eq!(names(plan.deleted()), vec!["p_20240101-000000.zip"]);
    }

    fn arb_artifacts() -> impl Strategy<Value = Vec<Artifact>> {
        // Roughly two years of snapshots at arbitrary seconds.
        prop::collection::btree_set(1_700_000_000i64..1_763_000_000i64, 0..60).prop_map(|secs| {
            secs.into_iter()
                .map(|s| artifact_at("p", DateTime::from_timestamp(s, 0).unwrap()))
                .collect()
        })
    }

    fn arb_policy() -> impl Strategy<Value = RetentionPolicy> {
        (0usize..10, 0usize..6, 0usize..6).prop_map(|(d, w, m)| RetentionPolicy::new(d, w, m))
    }

    proptest! {
        #[test]
        fn prop_retained_and_deleted_partition_input(
            artifacts in arb_artifacts(),
            policy in arb_policy(),
        ) {
            let plan = classify(artifacts.clone(), &policy);

            let input: HashSet<&str> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
            let kept: HashSet<&str> = plan.retained().iter().map(|(a, _)| a.file_name.as_str()).collect();
            let gone: HashSet<&str> = plan.deleted().iter().map(|a| a.file_name.as_str()).collect();

            prop_assert!(kept.is_disjoint(&gone));
            prop_assert_eq!(kept.len() + gone.len(), input.len());
            let union: HashSet<&str> = kept.union(&gone).copied().collect();
            prop_assert_eq!(union, input);
        }

        #[test]
        fn prop_tier_quotas_respected(
            artifacts in arb_artifacts(),
            policy in arb_policy(),
        ) {
            let plan = classify(artifacts, &policy);
            for tier in Tier::ALL {
                prop_assert!(plan.retained_in(tier) <= policy.quota(tier));
            }
        }

        #[test]
        fn prop_large_daily_quota_deletes_nothing(artifacts in arb_artifacts()) {
            let policy = RetentionPolicy::new(artifacts.len(), 0, 0);
            let plan = classify(artifacts, &policy);
            prop_assert!(plan.deleted().is_empty());
        }

        #[test]
        fn prop_classification_is_idempotent(
            artifacts in arb_artifacts(),
            policy in arb_policy(),
        ) {
            let first = classify(artifacts, &policy);
            let survivors: Vec<Artifact> = first.retained().iter().map(|(a, _)| a.clone()).collect();

            let second = classify(survivors, &policy);
            prop_assert!(second.deleted().is_empty());
            prop_assert_eq!(second.retained(), first.retained());
        }
    }
}
