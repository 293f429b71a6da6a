//! Strategy that skips builds for commits matching author/message patterns.
//!
//! Typical use is ignoring commits pushed by release bots or commits
//! tagged with a marker such as `[ci-skip]`.

use crate::config::FilterConfig;
use crate::error::Result;
use crate::traits::BuildStrategy;
use crate::wildcard::WildcardPattern;
use scm_model::{CommitMetadata, Head, Revision};
use tracing::debug;

/// Suppresses a build when the commit message or the commit author
/// matches the configured wildcard patterns.
///
/// ## Algorithm
/// 1. Resolve the effective revision (pull requests use their pull commit)
/// 2. Read author and message; blank values count as absent
/// 3. If both are absent, build
/// 4. Otherwise skip if the message matches OR the author matches
pub struct SkipCommitStrategy {
    message: WildcardPattern,
    author: WildcardPattern,
}

impl SkipCommitStrategy {
    /// Compile the patterns of `config`.
    pub fn new(config: &FilterConfig) -> Result<Self> {
        Ok(Self {
            message: WildcardPattern::compile(&config.message_pattern)?,
            author: WildcardPattern::compile(&config.author_pattern)?,
        })
    }

    pub fn message_pattern(&self) -> &str {
        self.message.as_str()
    }

    pub fn author_pattern(&self) -> &str {
        self.author.as_str()
    }

    /// True when the build for `revision` must not be triggered.
    pub fn should_skip(&self, revision: &Revision) -> bool {
        let effective = revision.effective();
        let author = effective.commit_author();
        let message = effective.commit_message();

        if author.is_none() && message.is_none() {
            debug!(
                "Revision {} carries no author or message, not skipping",
                effective.hash()
            );
            return false;
        }

        let message_matches = self.message.matches(message);
        let author_matches = self.author.matches(author);
        debug!(
            "Revision {}: message match = {}, author match = {}",
            effective.hash(),
            message_matches,
            author_matches
        );
        message_matches || author_matches
    }
}

impl BuildStrategy for SkipCommitStrategy {
    fn name(&self) -> &str {
        "SkipCommitStrategy"
    }

    fn is_automatic_build(&self, _head: &Head, revision: &Revision) -> bool {
        !self.should_skip(revision)
    }
}
