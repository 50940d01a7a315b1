//! Installed-state bookkeeping.
//!
//! Two independent signals describe the local installation:
//!
//! - the **install-tree marker** ([`is_installed`]): a known file under the system
//!   install directory, or the executable on `PATH`. This answers "is the app there?"
//! - the **version marker** ([`InstallStateStore`]): a plain-text file in the user's
//!   data directory holding the last version this installer applied. This answers
//!   "which version is there?". Its absence is a normal state meaning "unknown".

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::{InstallConfig, InstallerConfig};
use crate::distro::DistroIdentity;
use crate::system::Executor;
use crate::utils::{command_exists, safe_write};

/// Whether the application is present on this machine.
#[must_use]
pub fn is_installed(install: &InstallConfig) -> bool {
    if install.marker_file.exists() {
        debug!("Install marker {} present", install.marker_file.display());
        return true;
    }
    match install.executable.as_deref() {
        Some(executable) if command_exists(executable) => {
            debug!("Executable '{executable}' found on PATH");
            true
        }
        _ => false,
    }
}

/// Reads and writes the persisted version marker.
#[derive(Debug, Clone)]
pub struct InstallStateStore {
    path: PathBuf,
}

impl InstallStateStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Store at the configured version file location.
    #[must_use]
    pub fn from_config(config: &InstallerConfig) -> Self {
        Self::new(config.version_file())
    }

    /// Marker file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last recorded version, trimmed.
    ///
    /// Returns `None` when the marker is missing, empty, or unreadable; none of
    /// these is an error for the caller.
    #[must_use]
    pub fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let version = content.trim();
                if version.is_empty() {
                    debug!("Version marker {} is empty", self.path.display());
                    None
                } else {
                    Some(version.to_string())
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No version marker at {}", self.path.display());
                None
            }
            Err(e) => {
                warn!("Could not read version marker {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Record `version` as installed, creating parent directories as needed.
    ///
    /// The write is atomic: a crash leaves either the old or the new value.
    pub fn write(&self, version: &str) -> Result<()> {
        safe_write(&self.path, version.trim())
            .with_context(|| format!("Failed to record installed version {version}"))?;
        debug!("Recorded installed version {} in {}", version, self.path.display());
        Ok(())
    }
}

/// Best known installed version of `package`.
///
/// The version marker wins. On Arch-based systems a missing marker falls back to
/// the package manager, which knows about AUR and manual installs too.
pub async fn installed_version<E: Executor>(
    store: &InstallStateStore,
    identity: &DistroIdentity,
    executor: &E,
    package: &str,
) -> Option<String> {
    if let Some(version) = store.read() {
        return Some(version);
    }
    if identity.id.contains("arch") {
        let version = executor.installed_package_version(package).await;
        debug!("pacman reports {package} version {version:?}");
        return version;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeExecutor;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_installed_version_prefers_marker() {
        let temp = TempDir::new().unwrap();
        let store = InstallStateStore::new(temp.path().join("version.txt"));
        store.write("1.0.0").unwrap();
        let executor = FakeExecutor::new().with_package_version("2.0.0-1");

        let arch = DistroIdentity::new("arch", "", "");
        assert_eq!(
            installed_version(&store, &arch, &executor, "tac-writer").await.as_deref(),
            Some("1.0.0")
        );
        assert!(executor.package_queries().is_empty());
    }

    #[tokio::test]
    async fn test_installed_version_pacman_fallback_only_on_arch() {
        let temp = TempDir::new().unwrap();
        let store = InstallStateStore::new(temp.path().join("version.txt"));
        let executor = FakeExecutor::new().with_package_version("2.0.0-1");

        let arch = DistroIdentity::new("arch", "", "");
        assert_eq!(
            installed_version(&store, &arch, &executor, "tac-writer").await.as_deref(),
            Some("2.0.0-1")
        );

        let debian = DistroIdentity::new("debian", "", "");
        assert_eq!(installed_version(&store, &debian, &executor, "tac-writer").await, None);
        assert_eq!(executor.package_queries(), vec!["tac-writer".to_string()]);
    }

    #[test]
    fn test_missing_marker_reads_none() {
        let temp = TempDir::new().unwrap();
        let store = InstallStateStore::new(temp.path().join("version.txt"));
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_read_trims_whitespace() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("version.txt");
        fs::write(&path, "  1.4.2\n").unwrap();

        assert_eq!(InstallStateStore::new(&path).read().as_deref(), Some("1.4.2"));
    }

    #[test]
    fn test_blank_marker_reads_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("version.txt");
        fs::write(&path, " \n").unwrap();

        assert_eq!(InstallStateStore::new(&path).read(), None);
    }

    #[test]
    fn test_write_creates_parent_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = InstallStateStore::new(temp.path().join("data").join("app").join("version.txt"));

        store.write("1.0.0").unwrap();
        assert_eq!(store.read().as_deref(), Some("1.0.0"));

        store.write("2.0.0").unwrap();
        assert_eq!(store.read().as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_is_installed_by_marker_file() {
        let temp = TempDir::new().unwrap();
        let install = InstallConfig {
            install_dir: temp.path().to_path_buf(),
            marker_file: temp.path().join("main.py"),
            executable: None,
            fallback_launch: Vec::new(),
        };
        assert!(!is_installed(&install));

        fs::write(&install.marker_file, "").unwrap();
        assert!(is_installed(&install));
    }

    #[test]
    fn test_is_installed_by_executable() {
        let temp = TempDir::new().unwrap();
        let install = InstallConfig {
            install_dir: temp.path().to_path_buf(),
            marker_file: temp.path().join("absent"),
            executable: Some("sh".to_string()),
            fallback_launch: Vec::new(),
        };
        assert!(is_installed(&install));
    }
}
