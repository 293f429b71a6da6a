//! # SCM Model Crate
//!
//! Read-only inputs handed to the build-trigger filters by the
//! repository-metadata collaborator.
//!
//! ## Main Components
//!
//! - **types**: Revisions, heads, branches and the `CommitMetadata` capability
//! - **parser**: Load a `SourceSnapshot` from JSON
//! - **error**: Error types for snapshot loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use scm_model::{parse_snapshot, CommitMetadata};
//! use std::path::Path;
//!
//! let snapshot = parse_snapshot(Path::new("snapshot.json"))?;
//! for change in &snapshot.changes {
//!     println!("{} by {:?}", change.head.name(), change.revision.commit_author());
//! }
//! ```

pub mod error;
pub mod types;
pub mod parser;

pub use error::{Result, ScmModelError};
pub use parser::{parse_snapshot, parse_snapshot_str};
pub use types::{
    // Type aliases
    EpochMillis,
    PullRequestId,
    // Revisions
    CommitMetadata,
    CommitRevision,
    PullRequestRevision,
    Revision,
    non_blank,
    // Heads and branches
    Branch,
    BranchListing,
    Head,
    // Snapshot
    ChangeEvent,
    SourceSnapshot,
};
