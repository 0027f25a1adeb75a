use std::collections::HashMap;

use crate::error::{Result, TagScopeError};
use crate::formatter::TagFormatter;
use crate::version::Version;

/// Scripted [TagFormatter] for tests.
///
/// Tags registered with [MockTagFormatter::register] are valid and parse
/// to their registered version, which does not have to agree with the tag
/// text. Everything else is invalid and fails to parse.
#[derive(Debug)]
pub struct MockTagFormatter {
    pattern: String,
    tags: HashMap<String, Version>,
}

impl MockTagFormatter {
    /// Creates a mock reporting the given pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        MockTagFormatter {
            pattern: pattern.into(),
            tags: HashMap::new(),
        }
    }

    /// Registers a tag as valid, parsing to `version`.
    pub fn register(&mut self, tag: impl Into<String>, version: Version) {
        self.tags.insert(tag.into(), version);
    }
}

impl TagFormatter for MockTagFormatter {
    fn format(&self, version: &Version) -> String {
        version.to_string()
    }

    fn pattern(&self) -> String {
        self.pattern.clone()
    }

    fn is_valid(&self, tag: &str) -> Result<bool> {
        Ok(self.tags.contains_key(tag))
    }

    fn parse(&self, tag: &str) -> Result<Version> {
        self.tags
            .get(tag)
            .copied()
            .ok_or_else(|| TagScopeError::tag(format!("Unknown tag '{}'", tag)))
    }
}
