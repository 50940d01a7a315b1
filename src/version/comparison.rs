//! Numeric, segment-by-segment version comparison.
//!
//! Versions are compared as dotted integer lists: `-` is treated as `.`, each
//! segment is read as its leading decimal digits, and anything unparseable or
//! missing counts as `0`. This is deliberately *not* semantic versioning: there
//! are no pre-release precedence rules, so `1.0.0-rc1` compares equal to `1.0.0.0`
//! and `1.0-beta` equals `1.0.0`. Changing that would change when users are
//! offered updates.
//!
//! # Examples
//!
//! ```rust
//! use std::cmp::Ordering;
//! use tac_installer::version::VersionComparator;
//!
//! assert_eq!(VersionComparator::compare("1.2.0", "1.10.0"), Ordering::Less);
//! assert_eq!(VersionComparator::compare("1.2-3", "1.2.3"), Ordering::Equal);
//! assert_eq!(VersionComparator::compare("", "0.0.1"), Ordering::Less);
//! ```

use std::cmp::Ordering;

/// Total, deterministic comparator for loosely formatted version strings.
pub struct VersionComparator;

impl VersionComparator {
    /// Compare two version strings. Never fails; malformed segments degrade to `0`.
    #[must_use]
    pub fn compare(a: &str, b: &str) -> Ordering {
        let left = Self::segments(a);
        let right = Self::segments(b);
        let len = left.len().max(right.len());

        for index in 0..len {
            let l = left.get(index).copied().unwrap_or(0);
            let r = right.get(index).copied().unwrap_or(0);
            match l.cmp(&r) {
                Ordering::Equal => {}
                other => return other,
            }
        }

        Ordering::Equal
    }

    /// Whether `latest` should be offered over `installed`.
    ///
    /// An unknown installed version (`None` or blank) always needs an update,
    /// even against a latest version that is all zeroes.
    #[must_use]
    pub fn needs_update(installed: Option<&str>, latest: &str) -> bool {
        match installed.map(str::trim) {
            None | Some("") => true,
            Some(installed) => Self::compare(installed, latest) == Ordering::Less,
        }
    }

    fn segments(version: &str) -> Vec<u64> {
        version.replace('-', ".").split('.').map(Self::parse_segment).collect()
    }

    fn parse_segment(segment: &str) -> u64 {
        let segment = segment.trim_start();
        let segment = segment.strip_prefix('+').unwrap_or(segment);
        let end = segment.find(|c: char| !c.is_ascii_digit()).unwrap_or(segment.len());
        segment[..end].parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_versions() {
        for version in ["1.0.0", "0.0.1", "2.10.3", "1", "3.2.1-4"] {
            assert_eq!(VersionComparator::compare(version, version), Ordering::Equal, "{version}");
        }
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert_eq!(VersionComparator::compare("1.2.0", "1.10.0"), Ordering::Less);
        assert_eq!(VersionComparator::compare("1.10.0", "1.9.9"), Ordering::Greater);
    }

    #[test]
    fn test_empty_is_older_than_real_version() {
        assert_eq!(VersionComparator::compare("", "0.0.1"), Ordering::Less);
    }

    #[test]
    fn test_dash_normalized_to_dot() {
        assert_eq!(VersionComparator::compare("1.2-3", "1.2.3"), Ordering::Equal);
        assert_eq!(VersionComparator::compare("1.2-4", "1.2.3"), Ordering::Greater);
    }

    #[test]
    fn test_length_mismatch_padded_with_zero() {
        assert_eq!(VersionComparator::compare("1.2", "1.2.0.0"), Ordering::Equal);
        assert_eq!(VersionComparator::compare("1.2", "1.2.0.1"), Ordering::Less);
    }

    #[test]
    fn test_malformed_segments_degrade_to_zero() {
        assert_eq!(VersionComparator::compare("1.x.3", "1.0.3"), Ordering::Equal);
        assert_eq!(VersionComparator::compare("1.0.0-beta", "1.0.0"), Ordering::Equal);
        assert_eq!(VersionComparator::compare("garbage", ""), Ordering::Equal);
        // leading digits of a mixed segment still count
        assert_eq!(VersionComparator::compare("1.2rc1", "1.2"), Ordering::Equal);
        assert_eq!(VersionComparator::compare("1.3rc1", "1.2"), Ordering::Greater);
    }

    #[test]
    fn test_huge_segment_does_not_panic() {
        assert_eq!(
            VersionComparator::compare("1.99999999999999999999999", "1.0"),
            Ordering::Equal
        );
    }

    #[test]
    fn test_needs_update() {
        assert!(VersionComparator::needs_update(None, "1.0.0"));
        assert!(VersionComparator::needs_update(Some(""), "0.0.0"));
        assert!(VersionComparator::needs_update(Some("1.0.0"), "2.0.0"));
        assert!(!VersionComparator::needs_update(Some("1.0.0"), "1.0.0"));
        assert!(!VersionComparator::needs_update(Some("2.1"), "2.0.9"));
    }
}
