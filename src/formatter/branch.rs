use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::config::VersionFromBranch;
use crate::error::{Result, TagScopeError};
use crate::formatter::{TagFormatter, VERSION_GLOB};
use crate::version::Version;

/// Pattern applied when `version_from_branch = true`: a trailing
/// `major.minor` pair, or failing that a trailing bare major.
const DEFAULT_BRANCH_PATTERN: &str = r"[0-9]+\.[0-9]+$|[0-9]+$";

/// Version scope extracted from a branch name.
///
/// Decided once when the formatter is built and immutable afterwards;
/// renaming the branch has no effect on an existing formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchConstraint {
    /// The branch carries no version, formatting is unrestricted.
    Unconstrained,
    /// Tags must sit on the given version line. A missing minor means the
    /// whole major line is in scope.
    Pinned { major: u32, minor: Option<u32> },
}

impl BranchConstraint {
    /// Extracts the version scope from `branch_name` according to `source`.
    ///
    /// A disabled source and a branch the pattern does not match both yield
    /// [BranchConstraint::Unconstrained]. A branch the pattern does match
    /// must produce a clean `major` or `major.minor` fragment; anything
    /// else is a configuration error rather than a silent fallback.
    pub fn from_branch(source: &VersionFromBranch, branch_name: &str) -> Result<Self> {
        let pattern = match source {
            VersionFromBranch::Enabled(false) => return Ok(BranchConstraint::Unconstrained),
            VersionFromBranch::Enabled(true) => Regex::new(DEFAULT_BRANCH_PATTERN)?,
            VersionFromBranch::Pattern(raw) => resolve_regex(raw)?,
        };

        let captures = match pattern.captures(branch_name) {
            Some(captures) => captures,
            None => return Ok(BranchConstraint::Unconstrained),
        };

        // One group is the whole match, two means the pattern singled the
        // fragment out with an explicit capture. Any other shape leaves the
        // fragment ambiguous.
        let fragment = match captures.len() {
            1 => captures.get(0),
            2 => captures.get(1),
            _ => None,
        }
        .map(|group| group.as_str())
        .ok_or_else(|| {
            TagScopeError::config(format!(
                "Unable to parse version from branch '{}' using pattern '{}'",
                branch_name,
                pattern.as_str()
            ))
        })?;

        let segments: Vec<&str> = fragment.split('.').collect();
        if segments.len() > 2 {
            return Err(TagScopeError::config(format!(
                "The version '{}' from branch '{}' is invalid. It must be in the format 'major.minor' or 'major'",
                fragment, branch_name
            )));
        }

        let major = parse_segment(segments[0], "major", branch_name)?;
        let minor = match segments.get(1) {
            Some(raw) => Some(parse_segment(raw, "minor", branch_name)?),
            None => None,
        };

        Ok(BranchConstraint::Pinned { major, minor })
    }
}

impl fmt::Display for BranchConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchConstraint::Unconstrained => write!(f, "unconstrained"),
            BranchConstraint::Pinned { major, minor: None } => write!(f, "{}.x.x", major),
            BranchConstraint::Pinned {
                major,
                minor: Some(minor),
            } => write!(f, "{}.{}.x", major, minor),
        }
    }
}

fn parse_segment(raw: &str, field: &str, branch_name: &str) -> Result<u32> {
    raw.parse::<u32>().map_err(|_| {
        TagScopeError::config(format!(
            "The {} version '{}' from branch '{}' is invalid. It must be a number",
            field, raw, branch_name
        ))
    })
}

/// Compiles a user-supplied pattern string.
///
/// Accepts a delimited form `/body/flags` with flags limited to `i`, so
/// patterns written for other tools keep working. Anything that does not
/// fit the delimited form is compiled as a plain regex.
fn resolve_regex(raw: &str) -> Result<Regex> {
    if let Some(rest) = raw.strip_prefix('/') {
        if let Some(split) = rest.rfind('/') {
            let (body, flags) = rest.split_at(split);
            let flags = &flags[1..];
            if !body.is_empty() && flags.chars().all(|flag| flag == 'i') {
                let regex = RegexBuilder::new(body)
                    .case_insensitive(flags.contains('i'))
                    .build()?;
                return Ok(regex);
            }
        }
    }
    Ok(Regex::new(raw)?)
}

/// Narrows a wrapped [TagFormatter] to the version line named by a branch.
///
/// With an unconstrained scope every operation passes straight through, so
/// callers can wrap unconditionally.
///
/// # Example
/// ```
/// use git_tagscope::config::{Config, VersionFromBranch};
/// use git_tagscope::formatter::{BranchScopedFormatter, DefaultTagFormatter, TagFormatter};
///
/// let config = Config::default();
/// let base = DefaultTagFormatter::new(&config)?;
/// let source = VersionFromBranch::Enabled(true);
/// let scoped = BranchScopedFormatter::new(base, &source, "release/2.5")?;
///
/// assert_eq!(scoped.pattern(), "v2.5.*[0-9]");
/// assert!(scoped.is_valid("v2.5.9")?);
/// assert!(!scoped.is_valid("v3.0.0")?);
/// # Ok::<(), git_tagscope::TagScopeError>(())
/// ```
#[derive(Debug)]
pub struct BranchScopedFormatter<F: TagFormatter> {
    inner: F,
    constraint: BranchConstraint,
}

impl<F: TagFormatter> BranchScopedFormatter<F> {
    /// Wraps `inner`, extracting the version scope from `branch_name`.
    ///
    /// Fails when the configured pattern matches the branch but the match
    /// cannot be turned into a major/minor pair; see
    /// [BranchConstraint::from_branch].
    pub fn new(inner: F, source: &VersionFromBranch, branch_name: &str) -> Result<Self> {
        let constraint = BranchConstraint::from_branch(source, branch_name)?;
        Ok(BranchScopedFormatter { inner, constraint })
    }

    /// The version scope extracted at construction time.
    pub fn constraint(&self) -> BranchConstraint {
        self.constraint
    }
}

impl<F: TagFormatter> TagFormatter for BranchScopedFormatter<F> {
    fn format(&self, version: &Version) -> String {
        self.inner.format(version)
    }

    /// Substitutes the pinned components into the first version glob of
    /// the wrapped pattern, leaving surrounding prefix and namespace text
    /// untouched.
    fn pattern(&self) -> String {
        let pattern = self.inner.pattern();
        match self.constraint {
            BranchConstraint::Unconstrained => pattern,
            BranchConstraint::Pinned { major, minor: None } => {
                pattern.replacen(VERSION_GLOB, &format!("{}.*[0-9].*[0-9]", major), 1)
            }
            BranchConstraint::Pinned {
                major,
                minor: Some(minor),
            } => pattern.replacen(VERSION_GLOB, &format!("{}.{}.*[0-9]", major, minor), 1),
        }
    }

    /// Valid means valid for the wrapped formatter and on the pinned
    /// version line. A structurally broken tag is reported as invalid
    /// before the scope comparison, so this never parses garbage.
    fn is_valid(&self, tag: &str) -> Result<bool> {
        let (major, minor) = match self.constraint {
            BranchConstraint::Unconstrained => return self.inner.is_valid(tag),
            BranchConstraint::Pinned { major, minor } => (major, minor),
        };

        if !self.inner.is_valid(tag)? {
            return Ok(false);
        }

        let parsed = self.inner.parse(tag)?;
        if parsed.major != major {
            return Ok(false);
        }
        if let Some(minor) = minor {
            if parsed.minor != minor {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Parses through the wrapped formatter, then overrides the major with
    /// the pinned one and the minor with the pinned minor when present.
    /// The patch always comes from the tag itself.
    fn parse(&self, tag: &str) -> Result<Version> {
        let parsed = self.inner.parse(tag)?;
        match self.constraint {
            BranchConstraint::Unconstrained => Ok(parsed),
            BranchConstraint::Pinned { major, minor } => Ok(Version::new(
                major,
                minor.unwrap_or(parsed.minor),
                parsed.patch,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== constraint extraction ====================

    #[test]
    fn test_disabled_source_is_unconstrained() {
        let constraint =
            BranchConstraint::from_branch(&VersionFromBranch::Enabled(false), "release/2.5")
                .unwrap();
        assert_eq!(constraint, BranchConstraint::Unconstrained);
    }

    #[test]
    fn test_default_pattern_extracts_major_and_minor() {
        let constraint =
            BranchConstraint::from_branch(&VersionFromBranch::Enabled(true), "release/2.5")
                .unwrap();
        assert_eq!(
            constraint,
            BranchConstraint::Pinned {
                major: 2,
                minor: Some(5)
            }
        );
    }

    #[test]
    fn test_default_pattern_extracts_bare_major() {
        let constraint =
            BranchConstraint::from_branch(&VersionFromBranch::Enabled(true), "release-7").unwrap();
        assert_eq!(
            constraint,
            BranchConstraint::Pinned {
                major: 7,
                minor: None
            }
        );
    }

    #[test]
    fn test_default_pattern_ignores_versionless_branch() {
        let constraint =
            BranchConstraint::from_branch(&VersionFromBranch::Enabled(true), "feature/login")
                .unwrap();
        assert_eq!(constraint, BranchConstraint::Unconstrained);
    }

    #[test]
    fn test_default_pattern_only_matches_trailing_version() {
        // The version must sit at the end of the branch name.
        let constraint =
            BranchConstraint::from_branch(&VersionFromBranch::Enabled(true), "2.5/backport")
                .unwrap();
        assert_eq!(constraint, BranchConstraint::Unconstrained);
    }

    #[test]
    fn test_custom_pattern_with_capture_group() {
        let source = VersionFromBranch::Pattern(r"release-([0-9]+\.[0-9]+)".to_string());
        let constraint = BranchConstraint::from_branch(&source, "release-3.1-hotfix").unwrap();
        assert_eq!(
            constraint,
            BranchConstraint::Pinned {
                major: 3,
                minor: Some(1)
            }
        );
    }

    #[test]
    fn test_delimited_pattern_with_case_insensitive_flag() {
        let source = VersionFromBranch::Pattern(r"/RELEASE-([0-9]+)/i".to_string());
        let constraint = BranchConstraint::from_branch(&source, "release-4").unwrap();
        assert_eq!(
            constraint,
            BranchConstraint::Pinned {
                major: 4,
                minor: None
            }
        );
    }

    #[test]
    fn test_delimited_pattern_against_tag_like_branch() {
        let source = VersionFromBranch::Pattern(r"/v([0-9]+\.[0-9]+)/".to_string());
        let constraint = BranchConstraint::from_branch(&source, "v1.2.3").unwrap();
        assert_eq!(
            constraint,
            BranchConstraint::Pinned {
                major: 1,
                minor: Some(2)
            }
        );
    }

    #[test]
    fn test_ambiguous_capture_groups_are_rejected() {
        let source = VersionFromBranch::Pattern(r"([0-9]+)\.([0-9]+)".to_string());
        let result = BranchConstraint::from_branch(&source, "release/2.5");
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(
            message.contains("Unable to parse version from branch 'release/2.5'"),
            "got: {}",
            message
        );
    }

    #[test]
    fn test_three_segment_fragment_is_rejected() {
        let source = VersionFromBranch::Pattern(r"[0-9]+\.[0-9]+\.[0-9]+".to_string());
        let result = BranchConstraint::from_branch(&source, "hotfix/1.2.3");
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(
            message.contains("must be in the format 'major.minor' or 'major'"),
            "got: {}",
            message
        );
    }

    #[test]
    fn test_non_numeric_major_is_rejected() {
        let source = VersionFromBranch::Pattern(r"release/(.+)".to_string());
        let result = BranchConstraint::from_branch(&source, "release/abc");
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(
            message.contains("The major version 'abc' from branch 'release/abc'"),
            "got: {}",
            message
        );
    }

    #[test]
    fn test_non_numeric_minor_is_rejected() {
        let source = VersionFromBranch::Pattern(r"([0-9]+\.[a-z]+)".to_string());
        let result = BranchConstraint::from_branch(&source, "release/1.x");
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(
            message.contains("The minor version 'x' from branch 'release/1.x'"),
            "got: {}",
            message
        );
    }

    #[test]
    fn test_constraint_display() {
        assert_eq!(BranchConstraint::Unconstrained.to_string(), "unconstrained");
        assert_eq!(
            BranchConstraint::Pinned {
                major: 2,
                minor: None
            }
            .to_string(),
            "2.x.x"
        );
        assert_eq!(
            BranchConstraint::Pinned {
                major: 2,
                minor: Some(5)
            }
            .to_string(),
            "2.5.x"
        );
    }

    // ==================== pattern resolution ====================

    #[test]
    fn test_resolve_plain_pattern() {
        let regex = resolve_regex(r"v[0-9]+").unwrap();
        assert!(regex.is_match("v42"));
        assert!(!regex.is_match("V42"));
    }

    #[test]
    fn test_resolve_delimited_pattern_without_flags() {
        let regex = resolve_regex(r"/v[0-9]+/").unwrap();
        assert!(regex.is_match("v42"));
        assert!(!regex.is_match("V42"));
    }

    #[test]
    fn test_resolve_delimited_pattern_with_flag() {
        let regex = resolve_regex(r"/v[0-9]+/i").unwrap();
        assert!(regex.is_match("V42"));
    }

    #[test]
    fn test_unknown_flags_fall_back_to_plain_compilation() {
        // `g` is not a supported flag, so the whole string is the body and
        // the slashes match literally.
        let regex = resolve_regex(r"/v[0-9]+/g").unwrap();
        assert!(regex.is_match("/v42/g"));
        assert!(!regex.is_match("v42"));
    }

    #[test]
    fn test_unterminated_delimiter_is_a_plain_pattern() {
        let regex = resolve_regex(r"/release").unwrap();
        assert!(regex.is_match("feature/release"));
    }

    #[test]
    fn test_invalid_pattern_reports_pattern_error() {
        let result = resolve_regex(r"([0-9]+");
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Invalid pattern"), "got: {}", message);
    }
}
