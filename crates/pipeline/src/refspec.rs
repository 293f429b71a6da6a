//! Ref specs used to check out a head.
//!
//! Ref specs are kept as templates containing the `@{remote}` placeholder
//! and expanded once the remote name is known.

use scm_model::Head;
use std::fmt;
use tracing::debug;

/// Placeholder replaced by the remote name on expansion
pub const REMOTE_PLACEHOLDER: &str = "@{remote}";

/// Ref spec used when nothing else was requested
pub const DEFAULT_REF_SPEC: &str = "+refs/heads/*:refs/remotes/@{remote}/*";

/// A Git fetch ref spec, e.g. `+refs/heads/main:refs/remotes/origin/main`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefSpec {
    pub force: bool,
    pub source: String,
    pub destination: String,
}

impl RefSpec {
    /// Parse `[+]<source>:<destination>`. Returns `None` if there is no `:`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (force, rest) = match spec.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };
        let (source, destination) = rest.split_once(':')?;
        Some(Self {
            force,
            source: source.to_string(),
            destination: destination.to_string(),
        })
    }
}

impl fmt::Display for RefSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.force {
            write!(f, "+")?;
        }
        write!(f, "{}:{}", self.source, self.destination)
    }
}

/// Collects the ref specs needed to check out one head from one remote.
#[derive(Debug, Clone)]
pub struct CheckoutBuilder {
    head: Head,
    remote: String,
    templates: Vec<String>,
}

impl CheckoutBuilder {
    pub fn new(head: Head, remote: impl Into<String>) -> Self {
        Self {
            head,
            remote: remote.into(),
            templates: Vec::new(),
        }
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Add a ref spec template (may contain `@{remote}`). Duplicates are ignored.
    pub fn with_ref_spec(&mut self, template: impl Into<String>) -> &mut Self {
        let template = template.into();
        if !self.templates.contains(&template) {
            self.templates.push(template);
        }
        self
    }

    /// Expanded ref specs; the default spec when none were added.
    pub fn as_ref_specs(&self) -> Vec<RefSpec> {
        let templates: Vec<&str> = if self.templates.is_empty() {
            vec![DEFAULT_REF_SPEC]
        } else {
            self.templates.iter().map(String::as_str).collect()
        };
        templates
            .into_iter()
            .filter_map(|template| {
                let expanded = template.replace(REMOTE_PLACEHOLDER, &self.remote);
                let spec = RefSpec::parse(&expanded);
                if spec.is_none() {
                    debug!("Ignoring malformed ref spec {}", expanded);
                }
                spec
            })
            .collect()
    }
}

/// Adjusts a `CheckoutBuilder` before checkout.
pub trait CheckoutDecorator: Send + Sync {
    fn decorate(&self, builder: &mut CheckoutBuilder);
}

/// Fetches the target branch of pull requests so that builds can diff or
/// merge against it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PullRequestTargetBranch;

impl CheckoutDecorator for PullRequestTargetBranch {
    fn decorate(&self, builder: &mut CheckoutBuilder) {
        if let Some(target) = builder.head().target().map(str::to_string) {
            debug!("Adding target branch {} for {}", target, builder.head().name());
            builder.with_ref_spec(format!(
                "+refs/heads/{target}:refs/remotes/{REMOTE_PLACEHOLDER}/{target}"
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_target_branch_is_added() {
        let mut builder = CheckoutBuilder::new(Head::pull_request(3, "feature/x", "support/1.x"), "origin");
        PullRequestTargetBranch.decorate(&mut builder);

        let specs = builder.as_ref_specs();
        assert!(specs.contains(
            &RefSpec::parse("+refs/heads/support/1.x:refs/remotes/origin/support/1.x").unwrap()
        ));
    }

    #[test]
    fn test_no_ref_spec_added_for_branch() {
        let mut builder = CheckoutBuilder::new(Head::branch("support/1.x"), "origin");
        PullRequestTargetBranch.decorate(&mut builder);

        assert_eq!(
            builder.as_ref_specs(),
            vec![RefSpec::parse("+refs/heads/*:refs/remotes/origin/*").unwrap()]
        );
    }

    #[test]
    fn test_duplicate_templates_are_ignored() {
        let mut builder = CheckoutBuilder::new(Head::pull_request(3, "feature/x", "main"), "upstream");
        PullRequestTargetBranch.decorate(&mut builder);
        PullRequestTargetBranch.decorate(&mut builder);

        let specs = builder.as_ref_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].to_string(), "+refs/heads/main:refs/remotes/upstream/main");
    }

    #[test]
    fn test_ref_spec_parse_and_display() {
        let spec = RefSpec::parse("refs/heads/a:refs/remotes/o/a").unwrap();
        assert!(!spec.force);
        assert_eq!(spec.source, "refs/heads/a");
        assert_eq!(spec.to_string(), "refs/heads/a:refs/remotes/o/a");
        assert!(RefSpec::parse("refs/heads/a").is_none());
    }
}
