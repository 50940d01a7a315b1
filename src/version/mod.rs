//! Version handling for release tags and the installed-version marker.
//!
//! - [`comparison`] - the numeric [`VersionComparator`]
//! - [`strip_version_prefix`] - turns a release tag such as `v2.0.0` into `2.0.0`

pub mod comparison;

pub use comparison::VersionComparator;

/// Strip the leading `v` that release tags carry.
///
/// Only a single prefix character is removed, and only when it is `v`.
#[must_use]
pub fn strip_version_prefix(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}
