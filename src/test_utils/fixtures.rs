//! Filesystem fixtures.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::config::InstallerConfig;
use crate::distro::DistroProbe;
use crate::release::{ReleaseAsset, ReleaseInfo};
use crate::state::InstallStateStore;

/// A configuration whose every path lives inside a temporary directory.
///
/// The install-tree marker, the version marker and the os-release file are all
/// under [`root`](Self::root); no executable lookup is configured, so presence
/// is decided by the marker file alone.
pub struct InstallerFixture {
    temp: TempDir,
    /// Configuration pointing into the temporary directory.
    pub config: InstallerConfig,
}

impl InstallerFixture {
    /// Fresh fixture: nothing installed, no version marker.
    #[must_use]
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let install_dir = temp.path().join("usr").join("share").join("tac-writer");

        let mut config = InstallerConfig::default();
        config.install.marker_file = install_dir.join("main.py");
        config.install.install_dir = install_dir;
        config.install.executable = None;
        config.install.fallback_launch = Vec::new();
        config.version_file = Some(temp.path().join("data").join("tac-writer").join("version.txt"));

        Self {
            temp,
            config,
        }
    }

    /// Root of the temporary directory.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.temp.path().to_path_buf()
    }

    /// Write an os-release file and return a probe reading it.
    #[must_use]
    pub fn os_release(&self, content: &str) -> DistroProbe {
        let path = self.temp.path().join("os-release");
        fs::write(&path, content).unwrap();
        DistroProbe::new(path)
    }

    /// Probe for a distribution with the given `ID` and `ID_LIKE`.
    #[must_use]
    pub fn distro(&self, id: &str, id_like: &str) -> DistroProbe {
        self.os_release(&format!(
            "NAME=\"Test\"\nID={id}\nID_LIKE=\"{id_like}\"\nPRETTY_NAME=\"Test {id}\"\n"
        ))
    }

    /// Create the install-tree marker file.
    pub fn mark_installed(&self) {
        let marker = &self.config.install.marker_file;
        fs::create_dir_all(marker.parent().unwrap()).unwrap();
        fs::write(marker, "").unwrap();
    }

    /// Store for the fixture's version marker.
    #[must_use]
    pub fn store(&self) -> InstallStateStore {
        InstallStateStore::from_config(&self.config)
    }

    /// Set the version marker.
    pub fn write_marker(&self, version: &str) {
        self.store().write(version).unwrap();
    }

    /// Current version marker.
    #[must_use]
    pub fn marker(&self) -> Option<String> {
        self.store().read()
    }
}

impl Default for InstallerFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A release tagged `tag` carrying assets with the given names.
#[must_use]
pub fn release(tag: &str, assets: &[&str]) -> ReleaseInfo {
    ReleaseInfo {
        tag: tag.to_string(),
        name: Some(format!("TAC Writer {tag}")),
        body: Some("Bug fixes & improvements".to_string()),
        published_at: Some("2025-03-04T12:00:00Z".to_string()),
        assets: assets
            .iter()
            .map(|name| ReleaseAsset {
                name: (*name).to_string(),
                url: format!("https://example.invalid/download/{tag}/{name}"),
            })
            .collect(),
    }
}
