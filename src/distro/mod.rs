//! Host distribution detection.
//!
//! Reads an `/etc/os-release`-style file and normalizes the `ID`, `ID_LIKE` and
//! `PRETTY_NAME` keys into a [`DistroIdentity`]. A missing file or missing keys
//! produce empty strings rather than errors; the package policy decides later
//! whether an empty identity is supported (it is not).

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::DEFAULT_OS_RELEASE;

/// Normalized identity of the host distribution.
///
/// `id` and `id_like` are lowercased so matching is case-insensitive;
/// `pretty_name` keeps its original casing for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistroIdentity {
    /// `ID` key, e.g. `ubuntu`.
    pub id: String,
    /// `ID_LIKE` key, e.g. `debian`; may list several space-separated ids.
    pub id_like: String,
    /// `PRETTY_NAME` key, e.g. `Ubuntu 24.04 LTS`.
    pub pretty_name: String,
}

impl DistroIdentity {
    /// Build an identity, lowercasing the matchable fields.
    pub fn new(
        id: impl Into<String>,
        id_like: impl Into<String>,
        pretty_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into().to_lowercase(),
            id_like: id_like.into().to_lowercase(),
            pretty_name: pretty_name.into(),
        }
    }

    /// Parse os-release content. Later duplicate keys override earlier ones.
    #[must_use]
    pub fn from_os_release(content: &str) -> Self {
        let mut id = String::new();
        let mut id_like = String::new();
        let mut pretty_name = String::new();

        for line in content.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix("ID=") {
                id = unquote(value);
            } else if let Some(value) = line.strip_prefix("ID_LIKE=") {
                id_like = unquote(value);
            } else if let Some(value) = line.strip_prefix("PRETTY_NAME=") {
                pretty_name = unquote(value);
            }
        }

        Self::new(id, id_like, pretty_name)
    }

    /// Whether `needle` occurs in either `id` or `id_like`.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.id.contains(needle) || self.id_like.contains(needle)
    }

    /// Name for display: `PRETTY_NAME`, then `ID`, then a generic fallback.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.pretty_name.is_empty() {
            &self.pretty_name
        } else if !self.id.is_empty() {
            &self.id
        } else {
            "Linux"
        }
    }
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// Reads OS identification data from a fixed path.
#[derive(Debug, Clone)]
pub struct DistroProbe {
    path: PathBuf,
}

impl Default for DistroProbe {
    fn default() -> Self {
        Self::new(DEFAULT_OS_RELEASE)
    }
}

impl DistroProbe {
    /// Probe reading the given os-release file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file this probe reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identify the host. Never fails: an unreadable file yields an empty identity.
    #[must_use]
    pub fn identify(&self) -> DistroIdentity {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let identity = DistroIdentity::from_os_release(&content);
                debug!(
                    "Detected distribution id='{}' id_like='{}' pretty='{}'",
                    identity.id, identity.id_like, identity.pretty_name
                );
                identity
            }
            Err(e) => {
                debug!("Could not read {}: {}", self.path.display(), e);
                DistroIdentity::default()
            }
        }
    }
}
