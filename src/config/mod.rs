//! Installer configuration.
//!
//! Every process-wide literal of the installer (application name, feed coordinates,
//! install paths, SUSE dependency list) is a field of [`InstallerConfig`], so tests
//! and alternative deployments can substitute their own values.
//!
//! # Location
//!
//! The configuration file is resolved in this order:
//!
//! 1. `--config <PATH>` (or the `TAC_INSTALLER_CONFIG` environment variable)
//! 2. `<config_dir>/tac-installer/config.toml` (`~/.config/tac-installer/config.toml`)
//!
//! A missing default file yields [`InstallerConfig::default`]; a missing explicit
//! file is an error.
//!
//! # File Format
//!
//! Every key is optional:
//!
//! ```toml
//! app_name = "tac-writer"
//! pretty_name = "TAC Writer"
//!
//! [feed]
//! host = "api.github.com"
//! owner = "narayanls"
//! timeout_secs = 10
//!
//! [install]
//! install_dir = "/usr/share/tac-writer"
//! marker_file = "/usr/share/tac-writer/main.py"
//! executable = "tac-writer"
//!
//! [arch]
//! delivery = "aur"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::constants::{DEFAULT_USER_AGENT, FEED_TIMEOUT};
use crate::core::InstallerError;

const DEFAULT_APP_NAME: &str = "tac-writer";
const DEFAULT_INSTALL_DIR: &str = "/usr/share/tac-writer";

/// Packages the SUSE dependency step installs before the main package.
const DEFAULT_SUSE_DEPENDENCIES: &[&str] = &[
    "typelib-1_0-Gtk-4_0",
    "typelib-1_0-Adw-1",
    "libadwaita-1-0",
    "python312-dropbox",
    "python313",
    "python313-gobject",
    "python313-reportlab",
    "python313-pygtkspellcheck",
    "python313-pyenchant",
    "python313-Pillow",
    "python313-requests",
    "python313-pypdf",
    "python313-PyLaTeX",
    "gettext-runtime",
    "liberation-fonts",
    "myspell-pt_BR",
    "myspell-en_US",
    "myspell-es",
];

/// Top-level installer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Package / executable name of the managed application.
    pub app_name: String,
    /// Name shown in dialogs.
    pub pretty_name: String,
    /// Release feed coordinates.
    pub feed: FeedConfig,
    /// Where the application lives once installed.
    pub install: InstallConfig,
    /// Override for the persisted version marker location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_file: Option<PathBuf>,
    /// Packages installed by the SUSE pre-install step.
    pub suse_dependencies: Vec<String>,
    /// Arch-specific delivery settings.
    pub arch: ArchConfig,
    /// Dialog sizing.
    pub dialog: DialogConfig,
}

/// Release feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// API host serving `/repos/{owner}/{repo}/releases/latest`.
    pub host: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name; defaults to the application name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

/// Installed-tree settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// System directory the package installs into.
    pub install_dir: PathBuf,
    /// File whose presence means "already installed".
    pub marker_file: PathBuf,
    /// Executable looked up on `PATH`; its presence also means "already installed".
    pub executable: Option<String>,
    /// Command used to launch the application when the executable cannot be spawned.
    pub fallback_launch: Vec<String>,
}

/// How Arch-family systems receive the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchDelivery {
    /// Download the pre-built package from the release and install it with pacman.
    #[default]
    Package,
    /// Build from the AUR in a terminal (yay, paru, or makepkg).
    Aur,
}

/// Arch-specific settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchConfig {
    /// Delivery channel for Arch-family systems.
    pub delivery: ArchDelivery,
}

/// Dialog sizing passed to zenity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Width of question dialogs.
    pub width: u32,
    /// Width of error dialogs.
    pub error_width: u32,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            pretty_name: "TAC Writer".to_string(),
            feed: FeedConfig::default(),
            install: InstallConfig::default(),
            version_file: None,
            suse_dependencies: DEFAULT_SUSE_DEPENDENCIES.iter().map(ToString::to_string).collect(),
            arch: ArchConfig::default(),
            dialog: DialogConfig::default(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            host: "api.github.com".to_string(),
            owner: "narayanls".to_string(),
            repo: None,
            timeout_secs: FEED_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        let install_dir = PathBuf::from(DEFAULT_INSTALL_DIR);
        let entry_point = install_dir.join("main.py");
        Self {
            marker_file: entry_point.clone(),
            executable: Some(DEFAULT_APP_NAME.to_string()),
            fallback_launch: vec!["python3".to_string(), entry_point.display().to_string()],
            install_dir,
        }
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            width: 500,
            error_width: 400,
        }
    }
}

impl InstallerConfig {
    /// Load the configuration, honouring an explicit path when given.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path).await,
            _ => {
                debug!("No installer configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate the configuration stored at `path`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read installer config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse installer config from {}", path.display()))?;

        config.validate()?;
        debug!("Loaded installer configuration from {}", path.display());
        Ok(config)
    }

    /// Default configuration file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tac-installer").join("config.toml"))
    }

    /// Reject configurations the workflow cannot run with.
    pub fn validate(&self) -> Result<(), InstallerError> {
        if self.app_name.trim().is_empty() {
            return Err(InstallerError::Config {
                message: "app_name must not be empty".to_string(),
            });
        }
        if self.feed.owner.trim().is_empty() || self.feed.host.trim().is_empty() {
            return Err(InstallerError::Config {
                message: "feed.host and feed.owner must not be empty".to_string(),
            });
        }
        if self.feed.timeout_secs == 0 {
            return Err(InstallerError::Config {
                message: "feed.timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Repository name on the release feed.
    #[must_use]
    pub fn repo(&self) -> &str {
        self.feed.repo.as_deref().unwrap_or(&self.app_name)
    }

    /// URL of the latest-release endpoint.
    #[must_use]
    pub fn release_url(&self) -> String {
        format!(
            "https://{}/repos/{}/{}/releases/latest",
            self.feed.host.trim_end_matches('/'),
            self.feed.owner,
            self.repo()
        )
    }

    /// Request timeout for the release feed.
    #[must_use]
    pub const fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.timeout_secs)
    }

    /// Location of the persisted version marker.
    ///
    /// Lives outside the install tree, under the per-user data directory.
    #[must_use]
    pub fn version_file(&self) -> PathBuf {
        if let Some(path) = &self.version_file {
            return path.clone();
        }
        match dirs::data_dir() {
            Some(dir) => dir.join(&self.app_name).join("version.txt"),
            None => std::env::temp_dir().join(format!("{}-version.txt", self.app_name)),
        }
    }

    /// Title used for install confirmations.
    #[must_use]
    pub fn installer_title(&self) -> String {
        format!("{} Installer", self.pretty_name)
    }
}
