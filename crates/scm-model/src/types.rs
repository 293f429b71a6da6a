//! Core domain types for source-control change events.
//!
//! These types describe what the repository host reported for one
//! discovery cycle. They are read-only inputs: nothing in the workspace
//! mutates them after they have been loaded.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;

// =============================================================================
// Type Aliases
// =============================================================================

/// Milliseconds since the Unix epoch, as reported by the repository host
pub type EpochMillis = i64;

/// Numeric identifier of a pull request
pub type PullRequestId = u64;

// =============================================================================
// Commit metadata
// =============================================================================

/// Treats empty and whitespace-only values as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Capability of a revision to report the author and message of the
/// commit it points at.
///
/// Both accessors return `None` when the revision carries no metadata or
/// when the value is blank.
pub trait CommitMetadata {
    fn commit_author(&self) -> Option<&str>;
    fn commit_message(&self) -> Option<&str>;
}

/// A concrete commit on a Git or Mercurial repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRevision {
    pub hash: String,
    /// Raw author string, e.g. `"builder <no-reply@acme.com>"`
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CommitRevision {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            author: None,
            message: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl CommitMetadata for CommitRevision {
    fn commit_author(&self) -> Option<&str> {
        non_blank(self.author.as_deref())
    }

    fn commit_message(&self) -> Option<&str> {
        non_blank(self.message.as_deref())
    }
}

/// Revision of a pull request.
///
/// The pull request itself is a synthetic merge state; the meaningful
/// commit is `pull`, the head of the source branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRevision {
    pub pull: Box<Revision>,
    pub target: Box<Revision>,
}

impl CommitMetadata for PullRequestRevision {
    fn commit_author(&self) -> Option<&str> {
        self.pull.commit_author()
    }

    fn commit_message(&self) -> Option<&str> {
        self.pull.commit_message()
    }
}

/// A revision observed on a head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Revision {
    Git(CommitRevision),
    Mercurial(CommitRevision),
    PullRequest(PullRequestRevision),
    /// A revision type that carries no commit metadata at all
    Plain { hash: String },
}

impl Revision {
    /// The revision whose metadata describes this change.
    ///
    /// Pull-request revisions resolve to their pull revision; everything
    /// else resolves to itself.
    pub fn effective(&self) -> &Revision {
        match self {
            Revision::PullRequest(pr) => pr.pull.effective(),
            other => other,
        }
    }

    pub fn hash(&self) -> &str {
        match self {
            Revision::Git(commit) | Revision::Mercurial(commit) => &commit.hash,
            Revision::PullRequest(pr) => pr.pull.hash(),
            Revision::Plain { hash } => hash,
        }
    }
}

impl CommitMetadata for Revision {
    fn commit_author(&self) -> Option<&str> {
        match self {
            Revision::Git(commit) | Revision::Mercurial(commit) => commit.commit_author(),
            Revision::PullRequest(pr) => pr.commit_author(),
            Revision::Plain { .. } => None,
        }
    }

    fn commit_message(&self) -> Option<&str> {
        match self {
            Revision::Git(commit) | Revision::Mercurial(commit) => commit.commit_message(),
            Revision::PullRequest(pr) => pr.commit_message(),
            Revision::Plain { .. } => None,
        }
    }
}

// =============================================================================
// Heads and branches
// =============================================================================

/// A line of development tracked for build triggering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Head {
    Branch {
        name: String,
    },
    PullRequest {
        id: PullRequestId,
        /// Source branch of the pull request
        branch_name: String,
        /// Branch the pull request merges into
        target: String,
    },
}

impl Head {
    pub fn branch(name: impl Into<String>) -> Self {
        Head::Branch { name: name.into() }
    }

    pub fn pull_request(
        id: PullRequestId,
        branch_name: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Head::PullRequest {
            id,
            branch_name: branch_name.into(),
            target: target.into(),
        }
    }

    /// Display name: the branch name, or `PR-<id>` for pull requests.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Head::Branch { name } => Cow::Borrowed(name.as_str()),
            Head::PullRequest { id, .. } => Cow::Owned(format!("PR-{id}")),
        }
    }

    /// Name of the branch that actually holds the commits.
    pub fn branch_name(&self) -> &str {
        match self {
            Head::Branch { name } => name,
            Head::PullRequest { branch_name, .. } => branch_name,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Head::Branch { .. } => None,
            Head::PullRequest { target, .. } => Some(target),
        }
    }

    pub fn is_pull_request(&self) -> bool {
        matches!(self, Head::PullRequest { .. })
    }
}

/// A branch as listed by the repository host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    /// Timestamp of the most recent commit on the branch
    pub last_commit_millis: EpochMillis,
}

impl Branch {
    pub fn new(name: impl Into<String>, last_commit_millis: EpochMillis) -> Self {
        Self {
            name: name.into(),
            last_commit_millis,
        }
    }
}

/// All branches known to the repository host at discovery time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchListing {
    branches: Vec<Branch>,
}

impl BranchListing {
    pub fn new(branches: Vec<Branch>) -> Self {
        Self { branches }
    }

    /// First branch whose name equals `name` exactly.
    pub fn find(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.name == name)
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

impl From<Vec<Branch>> for BranchListing {
    fn from(branches: Vec<Branch>) -> Self {
        Self::new(branches)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// One detected change: the head it happened on and its current revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub head: Head,
    pub revision: Revision,
}

/// Everything one discovery cycle observed on a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    #[serde(default)]
    pub branches: BranchListing,
    #[serde(default)]
    pub changes: Vec<ChangeEvent>,
}

impl SourceSnapshot {
    /// Distinct heads with changes, in order of first appearance
    pub fn heads(&self) -> Vec<Head> {
        let mut seen = HashSet::new();
        self.changes
            .iter()
            .filter(|change| seen.insert(&change.head))
            .map(|change| change.head.clone())
            .collect()
    }
}
