//! Path prefix matching.
//!
//! # Responsibilities
//! - Hold the ordered set of redirect-eligible prefixes
//! - Report the first prefix a path starts with
//!
//! # Design Decisions
//! - Path matching is case-sensitive and literal
//! - Not segment-aware: `/chapters` matches `/chaptersfoo`
//! - First match wins, in configuration order
//! - No regex to guarantee O(n) matching

/// Matches the request path against one literal prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Ordered prefix set; immutable after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixSet {
    matchers: Vec<PathPrefixMatcher>,
}

impl PrefixSet {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matchers: prefixes.into_iter().map(PathPrefixMatcher::new).collect(),
        }
    }

    /// Returns the first matcher (in order) whose prefix `path` starts with.
    pub fn first_match(&self, path: &str) -> Option<&PathPrefixMatcher> {
        self.matchers.iter().find(|m| m.matches(path))
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
