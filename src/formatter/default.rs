use regex::Regex;

use crate::config::Config;
use crate::error::{Result, TagScopeError};
use crate::formatter::{TagFormatter, VERSION_GLOB};
use crate::version::Version;

/// Separator between the version digits and the namespace suffix.
const NAMESPACE_SEPARATOR: &str = "-";

/// Formats tags as `{prefix}{major}.{minor}.{patch}`, with an optional
/// `-{namespace}` suffix for repositories that tag several components.
///
/// # Example
/// ```
/// use git_tagscope::config::Config;
/// use git_tagscope::formatter::{DefaultTagFormatter, TagFormatter};
/// use git_tagscope::version::Version;
///
/// let formatter = DefaultTagFormatter::new(&Config::default())?;
/// assert_eq!(formatter.format(&Version::new(1, 2, 3)), "v1.2.3");
/// assert_eq!(formatter.pattern(), "v*[0-9].*[0-9].*[0-9]");
/// assert!(formatter.is_valid("v1.2.3")?);
/// # Ok::<(), git_tagscope::TagScopeError>(())
/// ```
#[derive(Debug)]
pub struct DefaultTagFormatter {
    tag_prefix: String,
    namespace: Option<String>,
    validity: Regex,
}

impl DefaultTagFormatter {
    /// Creates a formatter from the tag shape settings in `config`.
    ///
    /// An empty namespace string is treated the same as no namespace.
    pub fn new(config: &Config) -> Result<Self> {
        let tag_prefix = config.tag_prefix.clone();
        let namespace = config.namespace.clone().filter(|ns| !ns.is_empty());

        let validity = match &namespace {
            Some(ns) => Regex::new(&format!(
                "^{}[0-9]+\\.[0-9]+\\.[0-9]+{}{}$",
                regex::escape(&tag_prefix),
                regex::escape(NAMESPACE_SEPARATOR),
                regex::escape(ns)
            ))?,
            None => Regex::new(&format!(
                "^{}[0-9]+\\.[0-9]+\\.[0-9]+$",
                regex::escape(&tag_prefix)
            ))?,
        };

        Ok(DefaultTagFormatter {
            tag_prefix,
            namespace,
            validity,
        })
    }

    /// Strips the prefix and namespace affixes, leaving the dotted digits.
    fn version_part<'a>(&self, tag: &'a str) -> Result<&'a str> {
        let without_namespace = match &self.namespace {
            Some(ns) => {
                let suffix = format!("{}{}", NAMESPACE_SEPARATOR, ns);
                tag.strip_suffix(suffix.as_str()).unwrap_or(tag)
            }
            None => tag,
        };

        without_namespace
            .strip_prefix(&self.tag_prefix)
            .ok_or_else(|| {
                TagScopeError::tag(format!(
                    "Tag '{}' does not start with prefix '{}'",
                    tag, self.tag_prefix
                ))
            })
    }
}

impl TagFormatter for DefaultTagFormatter {
    fn format(&self, version: &Version) -> String {
        match &self.namespace {
            Some(ns) => format!(
                "{}{}{}{}",
                self.tag_prefix, version, NAMESPACE_SEPARATOR, ns
            ),
            None => format!("{}{}", self.tag_prefix, version),
        }
    }

    fn pattern(&self) -> String {
        match &self.namespace {
            Some(ns) => format!(
                "{}{}{}{}",
                self.tag_prefix, VERSION_GLOB, NAMESPACE_SEPARATOR, ns
            ),
            None => format!("{}{}", self.tag_prefix, VERSION_GLOB),
        }
    }

    fn is_valid(&self, tag: &str) -> Result<bool> {
        Ok(self.validity.is_match(tag))
    }

    /// Parses leniently: missing minor or patch segments default to zero,
    /// so tags like `v2.1` still yield a usable version. Non-numeric
    /// segments are an error.
    fn parse(&self, tag: &str) -> Result<Version> {
        let digits = self.version_part(tag)?;
        let segments: Vec<&str> = digits.split('.').collect();

        let component = |index: usize, name: &str| -> Result<u32> {
            match segments.get(index) {
                Some(raw) => raw.parse::<u32>().map_err(|_| {
                    TagScopeError::version(format!(
                        "Invalid {} version '{}' in tag '{}'",
                        name, raw, tag
                    ))
                }),
                None => Ok(0),
            }
        };

        Ok(Version::new(
            component(0, "major")?,
            component(1, "minor")?,
            component(2, "patch")?,
        ))
    }
}
