//! Filter implementations for the trigger pipeline.
//!
//! This module contains the concrete head filters and build strategies
//! that can be composed into a TriggerPipeline.

pub mod discard_old_branch;
pub mod skip_commit;

// Re-export for convenience
pub use discard_old_branch::DiscardOldBranchFilter;
pub use skip_commit::SkipCommitStrategy;
