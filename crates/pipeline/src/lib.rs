//! Build-trigger filters for source-control change events.
//!
//! This crate provides:
//! - `SkipCommitStrategy`, which skips builds whose commit author or message
//!   matches configured wildcard patterns
//! - `DiscardOldBranchFilter`, which drops branches idle for longer than a
//!   retention window
//! - `TriggerPipeline` for composing filters, strategies and checkout decorators
//!
//! ## Architecture
//! A host orchestration layer calls into the pipeline once per discovery cycle:
//! 1. Head filters prune heads that should be treated as nonexistent
//! 2. Build strategies decide, per detected change, whether to build
//! 3. Checkout decorators add ref specs needed to build a head
//!
//! Every decision is a pure function of its inputs (plus the wall clock for
//! the age filter). Missing or unusable data never suppresses a build and
//! never excludes a branch.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{should_skip, is_excluded, FilterConfig, RetentionConfig};
//!
//! let skip = should_skip(&FilterConfig::new(Some("*[ci-skip]*"), None), &revision);
//! let excluded = is_excluded(&RetentionConfig::new(30), &head, &branches);
//! ```

pub mod config;
pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod refspec;
pub mod traits;
pub mod wildcard;

// Re-export main types
pub use config::{FilterConfig, RetentionConfig, TriggerConfig};
pub use error::{FilterError, Result};
pub use filter_pipeline::{ChangeDecision, Decision, TriggerPipeline};
pub use filters::{DiscardOldBranchFilter, SkipCommitStrategy};
pub use refspec::{CheckoutBuilder, CheckoutDecorator, PullRequestTargetBranch, RefSpec};
pub use traits::{BuildStrategy, HeadFilter};
pub use wildcard::WildcardPattern;

use scm_model::{Branch, BranchListing, Head, Revision};

/// True when the build for `revision` should be skipped under `config`.
///
/// A pattern that cannot be compiled is logged and treated as "no filter".
pub fn should_skip(config: &FilterConfig, revision: &Revision) -> bool {
    match SkipCommitStrategy::new(config) {
        Ok(strategy) => strategy.should_skip(revision),
        Err(err) => {
            tracing::warn!("Ignoring skip-commit filter: {}", err);
            false
        }
    }
}

/// True when `head` should be pruned given the known `branches`.
///
/// Reads the wall clock once.
pub fn is_excluded(config: &RetentionConfig, head: &Head, branches: &[Branch]) -> bool {
    let listing = BranchListing::new(branches.to_vec());
    DiscardOldBranchFilter::new(*config).is_excluded(&listing, head)
}
