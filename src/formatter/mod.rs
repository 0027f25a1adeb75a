//! Tag formatting and recognition.
//!
//! The [TagFormatter] trait is the seam between tag shaping rules and the
//! code that applies them. Two implementations ship with the crate:
//!
//! - [DefaultTagFormatter] renders plain `{prefix}{major}.{minor}.{patch}`
//!   tags, optionally carrying a namespace suffix
//! - [BranchScopedFormatter] wraps any other formatter and narrows it to
//!   the version line named by a branch
//!
//! [MockTagFormatter] provides scripted behavior for tests that need full
//! control over the wrapped formatter.

pub mod branch;
pub mod default;
pub mod mock;

pub use branch::{BranchConstraint, BranchScopedFormatter};
pub use default::DefaultTagFormatter;
pub use mock::MockTagFormatter;

use crate::error::Result;
use crate::version::Version;

/// Glob standing in for the major, minor and patch positions of an
/// unrestricted tag pattern. Each `*[0-9]` component matches any text
/// ending in a digit.
pub const VERSION_GLOB: &str = "*[0-9].*[0-9].*[0-9]";

/// Shapes version tags and recognizes the tags it shaped.
///
/// Implementations agree on a contract between [TagFormatter::is_valid] and
/// [TagFormatter::parse]: any tag reported valid must also parse. The
/// reverse does not hold, parsing is deliberately lenient so callers can
/// inspect tags that fail validation.
pub trait TagFormatter {
    /// Render a version as a tag name.
    fn format(&self, version: &Version) -> String;

    /// Glob pattern matching the tags this formatter produces, suitable
    /// for `git tag --list` or `git describe --match`. Contains
    /// [VERSION_GLOB] at the version position unless a wrapper has
    /// narrowed it.
    fn pattern(&self) -> String;

    /// Whether a tag name is acceptable to this formatter.
    fn is_valid(&self, tag: &str) -> Result<bool>;

    /// Decompose a tag name into its numeric components.
    fn parse(&self, tag: &str) -> Result<Version>;
}
