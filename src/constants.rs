//! Constants used across the installer.
//!
//! Timeouts and fixed literals live here; everything that a deployment might
//! want to change (application name, paths, dependency lists) lives in
//! [`InstallerConfig`](crate::config::InstallerConfig) instead.

use std::time::Duration;

/// Timeout for the latest-release request (10 seconds).
///
/// A timeout surfaces as the same fatal network error as any other fetch failure.
pub const FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect timeout for asset downloads.
///
/// Downloads have no total timeout because packages can be large.
pub const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default location of the OS identification file.
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";

/// Environment variable pointing at an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "TAC_INSTALLER_CONFIG";

/// Default `User-Agent` sent to the release feed, which rejects anonymous clients.
pub const DEFAULT_USER_AGENT: &str = concat!("tac-installer/", env!("CARGO_PKG_VERSION"));

/// Program used to elevate package manager invocations.
pub const PRIVILEGE_HELPER: &str = "pkexec";

/// Dialog program used for graphical prompts.
pub const DIALOG_PROGRAM: &str = "zenity";
