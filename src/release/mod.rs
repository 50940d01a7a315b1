//! Latest-release metadata from the remote feed.
//!
//! - [`ReleaseInfo`] / [`ReleaseAsset`] mirror the feed's JSON document
//! - [`ReleaseFeed`] is the seam the orchestrator fetches through
//! - [`client::ReleaseClient`] is the HTTP implementation
//! - [`notes`] formats release metadata for the confirmation dialog
//!
//! Release information is fetched fresh on every run and never cached.

pub mod client;
pub mod notes;

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::core::InstallerError;
use crate::version::strip_version_prefix;

pub use client::ReleaseClient;

/// Asset name fragments marking non-x86_64 builds; such assets are never selected.
pub const NON_X86_MARKERS: &[&str] = &["arm", "aarch64"];

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// File name, e.g. `tac-writer-2.0.0-x86_64.deb`.
    pub name: String,
    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub url: String,
}

/// Metadata of the latest published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Release tag, usually `v`-prefixed.
    #[serde(rename = "tag_name")]
    pub tag: String,
    /// Release title.
    #[serde(default)]
    pub name: Option<String>,
    /// Release notes (markdown).
    #[serde(default)]
    pub body: Option<String>,
    /// RFC 3339 publish timestamp, kept verbatim so unparsable values can be displayed as-is.
    #[serde(default)]
    pub published_at: Option<String>,
    /// Attached files, in feed order.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseInfo {
    /// Version string with the tag's `v` prefix removed.
    #[must_use]
    pub fn version(&self) -> &str {
        strip_version_prefix(self.tag.trim())
    }

    /// Release notes, empty when the feed sent none.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// First x86_64 asset whose name ends with `suffix`.
    ///
    /// Assets whose name contains an ARM marker are skipped even when the suffix matches.
    #[must_use]
    pub fn find_asset(&self, suffix: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| {
            asset.name.ends_with(suffix)
                && !NON_X86_MARKERS.iter().any(|marker| asset.name.contains(marker))
        })
    }
}

/// Source of latest-release metadata.
///
/// Implementations must report every failure (unreachable host, timeout, non-200
/// status, malformed body, empty tag) as [`InstallerError::Network`].
pub trait ReleaseFeed {
    /// Fetch the latest release.
    fn latest(&self) -> impl Future<Output = Result<ReleaseInfo, InstallerError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release_with(names: &[&str]) -> ReleaseInfo {
        ReleaseInfo {
            tag: "v1.0.0".to_string(),
            name: None,
            body: None,
            published_at: None,
            assets: names
                .iter()
                .map(|name| ReleaseAsset {
                    name: (*name).to_string(),
                    url: format!("https://example.invalid/{name}"),
                })
                .collect(),
        }
    }

    #[test]
    fn test_find_asset_skips_arm_builds() {
        let release = release_with(&["app-1.0-aarch64.deb", "app-1.0-x86_64.deb"]);
        let asset = release.find_asset(".deb").unwrap();
        assert_eq!(asset.name, "app-1.0-x86_64.deb");

        let release = release_with(&["app-1.0-x86_64.deb", "app-1.0-aarch64.deb"]);
        assert_eq!(release.find_asset(".deb").unwrap().name, "app-1.0-x86_64.deb");
    }

    #[test]
    fn test_find_asset_skips_armhf() {
        let release = release_with(&["app-1.0-armhf.rpm", "app-1.0.noarch.rpm"]);
        assert_eq!(release.find_asset(".rpm").unwrap().name, "app-1.0.noarch.rpm");
    }

    #[test]
    fn test_find_asset_none_when_only_arm() {
        let release = release_with(&["app-1.0-aarch64.deb", "app-1.0.rpm"]);
        assert!(release.find_asset(".deb").is_none());
    }

    #[test]
    fn test_find_asset_requires_suffix() {
        let release = release_with(&["app-1.0.deb.sha256", "app-1.0.tar.gz"]);
        assert!(release.find_asset(".deb").is_none());
    }

    #[test]
    fn test_version_strips_prefix() {
        let release = release_with(&[]);
        assert_eq!(release.version(), "1.0.0");
        assert_eq!(release.body(), "");
    }

    #[test]
    fn test_deserialize_feed_document() {
        let json = r#"{
            "tag_name": "v2.1.0",
            "name": "TAC Writer 2.1.0",
            "body": null,
            "published_at": "2025-03-04T12:00:00Z",
            "draft": false,
            "assets": [
                {"name": "tac-writer-2.1.0.deb", "browser_download_url": "https://example.invalid/a.deb", "size": 10}
            ]
        }"#;
        let release: ReleaseInfo = serde_json::from_str(json).unwrap();
        assert_eq!(release.version(), "2.1.0");
        assert_eq!(release.body(), "");
        assert_eq!(release.published_at.as_deref(), Some("2025-03-04T12:00:00Z"));
        assert_eq!(release.assets[0].url, "https://example.invalid/a.deb");
    }
}
