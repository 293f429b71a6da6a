//! The TriggerPipeline orchestrates head filters and build strategies.
//!
//! This module provides the main TriggerPipeline struct that chains
//! filters together using the builder pattern and evaluates whole
//! discovery snapshots.

use crate::refspec::{CheckoutBuilder, CheckoutDecorator, RefSpec};
use crate::traits::{BuildStrategy, HeadFilter};
use rayon::prelude::*;
use scm_model::{BranchListing, ChangeEvent, Head, Revision, SourceSnapshot};
use serde::Serialize;
use std::fmt;

/// Outcome for one detected change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The head was pruned by a head filter
    Excluded,
    /// The head is kept but no strategy approved the build
    Skipped,
    Build,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Decision::Excluded => "excluded",
            Decision::Skipped => "skipped",
            Decision::Build => "build",
        };
        write!(f, "{label}")
    }
}

/// A decision together with the change it applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeDecision {
    pub head: String,
    pub revision: String,
    pub decision: Decision,
}

/// Chains head filters, build strategies and checkout decorators.
///
/// ## Usage
/// ```ignore
/// let pipeline = TriggerPipeline::new()
///     .add_head_filter(DiscardOldBranchFilter::new(RetentionConfig::new(30)))
///     .add_strategy(SkipCommitStrategy::new(&FilterConfig::new(Some("*[ci-skip]*"), None))?);
///
/// let decisions = pipeline.evaluate(&snapshot);
/// ```
pub struct TriggerPipeline {
    head_filters: Vec<Box<dyn HeadFilter>>,
    strategies: Vec<Box<dyn BuildStrategy>>,
    decorators: Vec<Box<dyn CheckoutDecorator>>,
}

impl TriggerPipeline {
    /// Create a new empty TriggerPipeline.
    pub fn new() -> Self {
        Self {
            head_filters: Vec::new(),
            strategies: Vec::new(),
            decorators: Vec::new(),
        }
    }

    /// Add a head filter (builder pattern).
    pub fn add_head_filter(mut self, filter: impl HeadFilter + 'static) -> Self {
        self.head_filters.push(Box::new(filter));
        self
    }

    /// Add a build strategy (builder pattern).
    pub fn add_strategy(mut self, strategy: impl BuildStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Add a checkout decorator (builder pattern).
    pub fn add_decorator(mut self, decorator: impl CheckoutDecorator + 'static) -> Self {
        self.decorators.push(Box::new(decorator));
        self
    }

    pub fn head_filter_count(&self) -> usize {
        self.head_filters.len()
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// True when any head filter excludes `head`.
    pub fn is_excluded(&self, listing: &BranchListing, head: &Head) -> bool {
        self.head_filters.iter().any(|filter| {
            let excluded = filter.is_excluded(listing, head);
            if excluded {
                tracing::debug!("Head {} excluded by {}", head.name(), filter.name());
            }
            excluded
        })
    }

    /// Drop excluded heads, keeping the order of the rest.
    ///
    /// Heads are evaluated in parallel; filters hold no mutable state.
    pub fn prune(&self, heads: Vec<Head>, listing: &BranchListing) -> Vec<Head> {
        let input_count = heads.len();
        let kept: Vec<Head> = heads
            .into_par_iter()
            .filter(|head| !self.is_excluded(listing, head))
            .collect();
        tracing::debug!("Pruned heads (input count: {}, kept: {})", input_count, kept.len());
        kept
    }

    /// Build when no strategy is configured, or when any strategy approves.
    pub fn should_build(&self, head: &Head, revision: &Revision) -> bool {
        if self.strategies.is_empty() {
            return true;
        }
        self.strategies.iter().any(|strategy| {
            let build = strategy.is_automatic_build(head, revision);
            tracing::debug!(
                "Strategy {} on {} at {}: build = {}",
                strategy.name(),
                head.name(),
                revision.hash(),
                build
            );
            build
        })
    }

    pub fn decide(&self, listing: &BranchListing, change: &ChangeEvent) -> Decision {
        if self.is_excluded(listing, &change.head) {
            Decision::Excluded
        } else if self.should_build(&change.head, &change.revision) {
            Decision::Build
        } else {
            Decision::Skipped
        }
    }

    /// Decide every change of a snapshot, in snapshot order.
    pub fn evaluate(&self, snapshot: &SourceSnapshot) -> Vec<ChangeDecision> {
        let decisions: Vec<ChangeDecision> = snapshot
            .changes
            .par_iter()
            .map(|change| ChangeDecision {
                head: change.head.name().into_owned(),
                revision: change.revision.hash().to_string(),
                decision: self.decide(&snapshot.branches, change),
            })
            .collect();
        tracing::info!(
            "Evaluated {} changes ({} to build)",
            decisions.len(),
            decisions.iter().filter(|d| d.decision == Decision::Build).count()
        );
        decisions
    }

    /// Ref specs to fetch `head` from `remote`, after all decorators ran.
    pub fn ref_specs(&self, head: &Head, remote: &str) -> Vec<RefSpec> {
        let mut builder = CheckoutBuilder::new(head.clone(), remote);
        for decorator in &self.decorators {
            decorator.decorate(&mut builder);
        }
        builder.as_ref_specs()
    }
}

impl Default for TriggerPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterConfig, RetentionConfig};
    use crate::filters::{DiscardOldBranchFilter, SkipCommitStrategy};
    use crate::refspec::PullRequestTargetBranch;
    use scm_model::{Branch, CommitRevision};

    struct ExcludeNamed(&'static str);

    impl HeadFilter for ExcludeNamed {
        fn name(&self) -> &str {
            "ExcludeNamed"
        }

        fn is_excluded(&self, _listing: &BranchListing, head: &Head) -> bool {
            head.branch_name() == self.0
        }
    }

    struct Always(bool);

    impl BuildStrategy for Always {
        fn name(&self) -> &str {
            "Always"
        }

        fn is_automatic_build(&self, _head: &Head, _revision: &Revision) -> bool {
            self.0
        }
    }

    fn revision(message: &str) -> Revision {
        Revision::Git(CommitRevision::new("abc").with_author("dev").with_message(message))
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = TriggerPipeline::new();
        let heads = vec![Head::branch("a"), Head::branch("b")];

        assert_eq!(pipeline.prune(heads.clone(), &BranchListing::default()), heads);
        assert!(pipeline.should_build(&Head::branch("a"), &revision("x")));
    }

    #[test]
    fn test_prune_keeps_order() {
        let pipeline = TriggerPipeline::new().add_head_filter(ExcludeNamed("b"));
        let heads = vec![Head::branch("a"), Head::branch("b"), Head::branch("c")];

        let kept = pipeline.prune(heads, &BranchListing::default());
        assert_eq!(kept, vec![Head::branch("a"), Head::branch("c")]);
    }

    #[test]
    fn test_any_strategy_approves() {
        let head = Head::branch("a");
        let pipeline = TriggerPipeline::new().add_strategy(Always(false)).add_strategy(Always(true));
        assert!(pipeline.should_build(&head, &revision("x")));

        let pipeline = TriggerPipeline::new().add_strategy(Always(false));
        assert!(!pipeline.should_build(&head, &revision("x")));
    }

    #[test]
    fn test_evaluate_snapshot() {
        let old = 0;
        let snapshot = SourceSnapshot {
            branches: BranchListing::from(vec![Branch::new("stale", old)]),
            changes: vec![
                ChangeEvent {
                    head: Head::branch("stale"),
                    revision: revision("feature"),
                },
                ChangeEvent {
                    head: Head::branch("fresh"),
                    revision: revision("[ci-skip] bump"),
                },
                ChangeEvent {
                    head: Head::branch("fresh"),
                    revision: revision("feature"),
                },
            ],
        };

        let pipeline = TriggerPipeline::new()
            .add_head_filter(DiscardOldBranchFilter::new(RetentionConfig::new(1)))
            .add_strategy(SkipCommitStrategy::new(&FilterConfig::new(Some("[ci-skip]*"), None)).unwrap());

        let decisions: Vec<Decision> = pipeline.evaluate(&snapshot).into_iter().map(|d| d.decision).collect();
        assert_eq!(decisions, vec![Decision::Excluded, Decision::Skipped, Decision::Build]);
    }

    #[test]
    fn test_ref_specs_with_decorator() {
        let pipeline = TriggerPipeline::new().add_decorator(PullRequestTargetBranch);
        let specs = pipeline.ref_specs(&Head::pull_request(1, "feature/x", "main"), "origin");
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].to_string(), "+refs/heads/main:refs/remotes/origin/main");

        let specs = TriggerPipeline::new().ref_specs(&Head::pull_request(1, "feature/x", "main"), "origin");
        assert_eq!(specs[0].to_string(), "+refs/heads/*:refs/remotes/origin/*");
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(Decision::Build.to_string(), "build");
        assert_eq!(Decision::Excluded.to_string(), "excluded");
    }
}
