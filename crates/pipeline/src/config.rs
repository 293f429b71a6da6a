//! Configuration for the trigger filters.
//!
//! Configuration is plain JSON, e.g.
//!
//! ```json
//! {
//!   "skip_commit": { "message_pattern": "*[ci-skip]*", "author_pattern": "*@bots.acme.com*" },
//!   "discard_old_branch": { "keep_for_days": 30 },
//!   "pull_request_target_branch": true
//! }
//! ```
//!
//! Every section is optional. A missing section disables that filter.

use crate::error::{FilterError, Result};
use crate::filter_pipeline::TriggerPipeline;
use crate::filters::{DiscardOldBranchFilter, SkipCommitStrategy};
use crate::refspec::PullRequestTargetBranch;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Patterns that suppress a build when the commit author or message matches.
///
/// Blank patterns are stored as the empty string, which never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default, deserialize_with = "blank_as_empty")]
    pub message_pattern: String,
    #[serde(default, deserialize_with = "blank_as_empty")]
    pub author_pattern: String,
}

impl FilterConfig {
    pub fn new(message_pattern: Option<&str>, author_pattern: Option<&str>) -> Self {
        Self {
            message_pattern: default_if_blank(message_pattern),
            author_pattern: default_if_blank(author_pattern),
        }
    }

    /// True when neither pattern is configured.
    pub fn is_noop(&self) -> bool {
        self.message_pattern.is_empty() && self.author_pattern.is_empty()
    }
}

fn default_if_blank(value: Option<&str>) -> String {
    scm_model::non_blank(value).unwrap_or_default().to_string()
}

fn blank_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(default_if_blank(value.as_deref()))
}

/// How long a branch stays eligible after its last commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Days to keep a branch. Values `<= 0` disable the filter.
    #[serde(default = "default_keep_for_days")]
    pub keep_for_days: i32,
}

fn default_keep_for_days() -> i32 {
    1
}

impl RetentionConfig {
    pub fn new(keep_for_days: i32) -> Self {
        Self { keep_for_days }
    }

    pub fn is_enabled(&self) -> bool {
        self.keep_for_days > 0
    }

    /// Configuration-time check. The filter itself tolerates any value.
    pub fn validate(&self) -> Result<()> {
        if self.keep_for_days <= 0 {
            return Err(FilterError::InvalidRetention {
                keep_for_days: self.keep_for_days,
            });
        }
        Ok(())
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self::new(default_keep_for_days())
    }
}

/// All trigger settings for one repository source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    #[serde(default)]
    pub skip_commit: Option<FilterConfig>,
    #[serde(default)]
    pub discard_old_branch: Option<RetentionConfig>,
    /// Also fetch the target branch of pull requests
    #[serde(default)]
    pub pull_request_target_branch: bool,
}

impl TriggerConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        debug!("Loaded trigger configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: TriggerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(retention) = &self.discard_old_branch {
            retention.validate()?;
        }
        Ok(())
    }

    /// Build the pipeline described by this configuration.
    pub fn build_pipeline(&self) -> Result<TriggerPipeline> {
        let mut pipeline = TriggerPipeline::new();
        if let Some(retention) = self.discard_old_branch {
            pipeline = pipeline.add_head_filter(DiscardOldBranchFilter::new(retention));
        }
        if let Some(filter) = &self.skip_commit {
            pipeline = pipeline.add_strategy(SkipCommitStrategy::new(filter)?);
        }
        if self.pull_request_target_branch {
            pipeline = pipeline.add_decorator(PullRequestTargetBranch);
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_config_normalizes_blank() {
        let config = FilterConfig::new(None, Some("   "));
        assert_eq!(config.message_pattern, "");
        assert_eq!(config.author_pattern, "");
        assert!(config.is_noop());

        let config = FilterConfig::new(Some("initial*"), None);
        assert_eq!(config.message_pattern, "initial*");
        assert!(!config.is_noop());
    }

    #[test]
    fn test_filter_config_deserialize() {
        let config: FilterConfig =
            serde_json::from_str(r#"{ "message_pattern": null, "author_pattern": " " }"#).unwrap();
        assert_eq!(config, FilterConfig::default());

        let config: FilterConfig = serde_json::from_str(r#"{ "author_pattern": "*@acme.com*" }"#).unwrap();
        assert_eq!(config.author_pattern, "*@acme.com*");
        assert_eq!(config.message_pattern, "");
    }

    #[test]
    fn test_retention_defaults_and_validation() {
        assert_eq!(RetentionConfig::default().keep_for_days, 1);
        let config: RetentionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.keep_for_days, 1);

        assert!(RetentionConfig::new(5).validate().is_ok());
        assert!(matches!(
            RetentionConfig::new(0).validate(),
            Err(FilterError::InvalidRetention { keep_for_days: 0 })
        ));
        assert!(RetentionConfig::new(-3).validate().is_err());
        assert!(!RetentionConfig::new(-3).is_enabled());
    }

    #[test]
    fn test_trigger_config_from_json() {
        let config = TriggerConfig::from_json(
            r#"{
                "skip_commit": { "message_pattern": "*[ci-skip]*" },
                "discard_old_branch": { "keep_for_days": 30 },
                "pull_request_target_branch": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.skip_commit.unwrap().message_pattern, "*[ci-skip]*");
        assert_eq!(config.discard_old_branch, Some(RetentionConfig::new(30)));
        assert!(config.pull_request_target_branch);
    }

    #[test]
    fn test_trigger_config_rejects_non_positive_days() {
        let result = TriggerConfig::from_json(r#"{ "discard_old_branch": { "keep_for_days": 0 } }"#);
        assert!(matches!(result, Err(FilterError::InvalidRetention { .. })));
    }

    #[test]
    fn test_trigger_config_malformed() {
        let result = TriggerConfig::from_json("{ not json");
        assert!(matches!(result, Err(FilterError::ConfigError(_))));
    }

    #[test]
    fn test_empty_config_builds_empty_pipeline() {
        let pipeline = TriggerConfig::default().build_pipeline().unwrap();
        assert_eq!(pipeline.head_filter_count(), 0);
        assert_eq!(pipeline.strategy_count(), 0);
    }
}
