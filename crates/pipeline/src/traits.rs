//! Core traits for the trigger pipeline.
//!
//! Two seams are exposed to the hosting orchestration layer:
//! head filters prune heads before they become build candidates, and
//! build strategies decide whether a detected change is built.

use scm_model::{BranchListing, Head, Revision};

/// Removes heads from consideration during branch discovery.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be evaluated in parallel
/// - Filters never fail: missing data means "not excluded"
pub trait HeadFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// True when `head` should be treated as if it did not exist.
    ///
    /// # Arguments
    /// * `listing` - All branches the repository host reported
    /// * `head` - The head under evaluation
    fn is_excluded(&self, listing: &BranchListing, head: &Head) -> bool;
}

/// Decides whether a detected change triggers a build.
pub trait BuildStrategy: Send + Sync {
    /// Returns the name of this strategy (for logging/debugging)
    fn name(&self) -> &str;

    /// True when the change on `head` at `revision` should be built.
    fn is_automatic_build(&self, head: &Head, revision: &Revision) -> bool;
}
