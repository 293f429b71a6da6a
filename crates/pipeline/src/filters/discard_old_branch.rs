//! Filter that discards branches without recent commits.
//!
//! A branch stays eligible for `keep_for_days` calendar days counted from
//! the start of the day of its last commit, in the local timezone.

use crate::config::RetentionConfig;
use crate::traits::HeadFilter;
use chrono::{DateTime, Days, Local, TimeZone};
use scm_model::{Branch, BranchListing, EpochMillis, Head};
use tracing::debug;

/// Excludes heads whose branch has been idle longer than the retention window.
///
/// ## Algorithm
/// 1. If `keep_for_days <= 0`, the filter is disabled
/// 2. Look up the head's underlying branch by exact name (pull requests
///    use their source branch, not `PR-<id>`); unknown branches are kept
/// 3. expiry = start of the last-commit day + `keep_for_days` days
/// 4. Exclude when expiry is strictly before now
pub struct DiscardOldBranchFilter {
    keep_for_days: i32,
}

impl DiscardOldBranchFilter {
    pub fn new(config: RetentionConfig) -> Self {
        Self {
            keep_for_days: config.keep_for_days,
        }
    }

    pub fn keep_for_days(&self) -> i32 {
        self.keep_for_days
    }

    /// Moment after which a branch last committed at `last_commit_millis`
    /// is discarded. `None` when the filter is disabled or the date cannot
    /// be represented in the local timezone.
    pub fn expiry_date(&self, last_commit_millis: EpochMillis) -> Option<DateTime<Local>> {
        if self.keep_for_days <= 0 {
            return None;
        }
        let committed = Local.timestamp_millis_opt(last_commit_millis).single()?;
        committed
            .date_naive()
            .checked_add_days(Days::new(u64::from(self.keep_for_days.unsigned_abs())))?
            .and_hms_opt(0, 0, 0)?
            .and_local_timezone(Local)
            .earliest()
    }

    /// True when `branch` has expired at `now`.
    pub fn is_expired_at(&self, branch: &Branch, now: DateTime<Local>) -> bool {
        match self.expiry_date(branch.last_commit_millis) {
            Some(expiry) => expiry < now,
            None => {
                debug!(
                    "No expiry date for branch {} (last commit {}), keeping it",
                    branch.name, branch.last_commit_millis
                );
                false
            }
        }
    }

    /// Same as `HeadFilter::is_excluded`, against an explicit clock reading.
    pub fn is_excluded_at(&self, listing: &BranchListing, head: &Head, now: DateTime<Local>) -> bool {
        if self.keep_for_days <= 0 {
            return false;
        }
        let branch_name = head.branch_name();
        match listing.find(branch_name) {
            Some(branch) => {
                let excluded = self.is_expired_at(branch, now);
                debug!(
                    "Head {} (branch {}): keep for {} days, excluded = {}",
                    head.name(),
                    branch_name,
                    self.keep_for_days,
                    excluded
                );
                excluded
            }
            None => {
                debug!(
                    "Head {}: branch {} not in listing, keeping it",
                    head.name(),
                    branch_name
                );
                false
            }
        }
    }
}

impl HeadFilter for DiscardOldBranchFilter {
    fn name(&self) -> &str {
        "DiscardOldBranchFilter"
    }

    fn is_excluded(&self, listing: &BranchListing, head: &Head) -> bool {
        self.is_excluded_at(listing, head, Local::now())
    }
}
