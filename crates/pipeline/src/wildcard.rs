//! Wildcard patterns for commit authors and messages.
//!
//! A wildcard string is a space-separated list of alternatives. Inside an
//! alternative `*` matches any run of characters (newlines included) and
//! everything else is literal. A value matches when the whole value
//! matches at least one alternative.

use crate::error::{FilterError, Result};
use regex::Regex;
use scm_model::non_blank;

/// A compiled wildcard expression.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    /// `None` when the expression has no alternatives and can never match
    regex: Option<Regex>,
}

impl WildcardPattern {
    /// Compile a wildcard expression.
    ///
    /// # Errors
    /// Returns `FilterError::InvalidPattern` if the translated expression is
    /// rejected by the regex engine (in practice only for size limits).
    pub fn compile(wildcards: &str) -> Result<Self> {
        let regex = match to_regex_source(wildcards) {
            Some(source) => Some(Regex::new(&source).map_err(|source| {
                FilterError::InvalidPattern {
                    pattern: wildcards.to_string(),
                    source,
                }
            })?),
            None => None,
        };
        Ok(Self {
            source: wildcards.to_string(),
            regex,
        })
    }

    /// The wildcard expression as configured
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when no value can ever match.
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// Full-string match. Blank values never match.
    pub fn is_match(&self, value: &str) -> bool {
        self.matches(Some(value))
    }

    /// Like `is_match`, for values that may be absent.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (&self.regex, non_blank(value)) {
            (Some(regex), Some(value)) => regex.is_match(value),
            _ => false,
        }
    }
}

/// Translate a wildcard expression into an anchored regular expression.
///
/// Returns `None` when the expression contains no non-empty alternative.
pub fn to_regex_source(wildcards: &str) -> Option<String> {
    let alternatives: Vec<String> = wildcards
        .split(' ')
        .map(translate_alternative)
        .filter(|alternative| !alternative.is_empty())
        .collect();

    if alternatives.is_empty() {
        return None;
    }
    Some(format!("(?s)^(?:{})$", alternatives.join("|")))
}

fn translate_alternative(alternative: &str) -> String {
    let mut translated = String::with_capacity(alternative.len() * 2);
    for segment in split_around_stars(alternative) {
        if segment == "*" {
            translated.push_str(".*");
        } else {
            translated.push_str(&regex::escape(segment));
        }
    }
    translated
}

/// Split so that every `*` is its own segment, e.g. `foo*bar` gives
/// `["foo", "*", "bar"]`. Empty segments are dropped.
fn split_around_stars(alternative: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (idx, _) in alternative.match_indices('*') {
        if start < idx {
            segments.push(&alternative[start..idx]);
        }
        segments.push(&alternative[idx..idx + 1]);
        start = idx + 1;
    }
    if start < alternative.len() {
        segments.push(&alternative[start..]);
    }
    segments
}
