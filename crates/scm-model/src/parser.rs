//! Parser for source snapshot files.
//!
//! A snapshot is a JSON document with two arrays:
//! - `branches`: `{ "name": "...", "last_commit_millis": 1537541879455 }`
//! - `changes`: `{ "head": {...}, "revision": {...} }`
//!
//! Heads and revisions are tagged with a `kind` field, e.g.
//! `{ "kind": "pull_request", "id": 7, "branch_name": "feature/x", "target": "master" }`.

use crate::error::{Result, ScmModelError};
use crate::types::SourceSnapshot;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse a snapshot from a JSON file on disk
pub fn parse_snapshot(path: &Path) -> Result<SourceSnapshot> {
    if !path.exists() {
        return Err(ScmModelError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    let snapshot = parse_snapshot_str(&content)?;
    debug!(
        "Loaded snapshot {} ({} branches, {} changes)",
        path.display(),
        snapshot.branches.len(),
        snapshot.changes.len()
    );
    Ok(snapshot)
}

/// Parse a snapshot from a JSON string
pub fn parse_snapshot_str(content: &str) -> Result<SourceSnapshot> {
    let snapshot: SourceSnapshot = serde_json::from_str(content)?;
    validate(&snapshot)?;
    Ok(snapshot)
}

fn validate(snapshot: &SourceSnapshot) -> Result<()> {
    for (idx, branch) in snapshot.branches.branches().iter().enumerate() {
        if branch.name.trim().is_empty() {
            return Err(ScmModelError::ValidationError(format!(
                "branch #{} has an empty name",
                idx + 1
            )));
        }
    }
    for (idx, change) in snapshot.changes.iter().enumerate() {
        if change.head.branch_name().trim().is_empty() {
            return Err(ScmModelError::ValidationError(format!(
                "change #{} refers to a head with an empty branch name",
                idx + 1
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CommitMetadata, Head, Revision};

    const SNAPSHOT: &str = r#"{
        "branches": [
            { "name": "master", "last_commit_millis": 1537541879455 },
            { "name": "feature/release", "last_commit_millis": 1537541879455 }
        ],
        "changes": [
            {
                "head": { "kind": "branch", "name": "master" },
                "revision": {
                    "kind": "git",
                    "hash": "12345674890",
                    "author": "builder <no-reply@acme.com>",
                    "message": "initial commit"
                }
            },
            {
                "head": { "kind": "pull_request", "id": 7, "branch_name": "feature/release", "target": "master" },
                "revision": {
                    "kind": "pull_request",
                    "pull": { "kind": "mercurial", "hash": "abc", "author": "dev <dev@acme.com>" },
                    "target": { "kind": "plain", "hash": "def" }
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_snapshot_str() {
        let snapshot = parse_snapshot_str(SNAPSHOT).unwrap();

        assert_eq!(snapshot.branches.len(), 2);
        assert_eq!(snapshot.changes.len(), 2);

        let first = &snapshot.changes[0];
        assert_eq!(first.head, Head::branch("master"));
        assert_eq!(first.revision.commit_message(), Some("initial commit"));

        let second = &snapshot.changes[1];
        assert_eq!(second.head.name(), "PR-7");
        assert_eq!(second.head.branch_name(), "feature/release");
        assert!(matches!(second.revision, Revision::PullRequest(_)));
        assert_eq!(second.revision.commit_author(), Some("dev <dev@acme.com>"));
        assert_eq!(second.revision.commit_message(), None);
    }

    #[test]
    fn test_parse_empty_snapshot() {
        let snapshot = parse_snapshot_str("{}").unwrap();
        assert!(snapshot.branches.is_empty());
        assert!(snapshot.changes.is_empty());
    }

    #[test]
    fn test_parse_rejects_blank_branch_name() {
        let result = parse_snapshot_str(r#"{ "branches": [ { "name": " ", "last_commit_millis": 0 } ] }"#);
        assert!(matches!(result, Err(ScmModelError::ValidationError(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_revision_kind() {
        let result = parse_snapshot_str(
            r#"{ "changes": [ { "head": { "kind": "branch", "name": "x" }, "revision": { "kind": "svn", "hash": "1" } } ] }"#,
        );
        assert!(matches!(result, Err(ScmModelError::JsonError(_))));
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_snapshot(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(ScmModelError::FileNotFound { .. })));
    }
}
