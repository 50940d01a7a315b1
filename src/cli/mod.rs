//! Command-line interface for the installer.
//!
//! # Commands
//!
//! - `install` (default) - install or update the application interactively
//! - `check` - report installed and latest versions without changing anything
//! - `detect` - show the detected distribution and package plan (offline)
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - log level (`RUST_LOG` overrides both)
//! - `--config <PATH>` - configuration file (also `TAC_INSTALLER_CONFIG`)
//! - `--os-release <PATH>` - OS identification file to read
//! - `--no-gui` - prompt in the terminal instead of zenity dialogs
//!
//! # Examples
//!
//! ```bash
//! tac-installer                 # install or update with dialogs
//! tac-installer install --yes   # unattended
//! tac-installer --no-gui check  # what would happen?
//! tac-installer detect --os-release ./os-release
//! ```

mod check;
mod detect;
mod install;

pub use check::CheckCommand;
pub use detect::DetectCommand;
pub use install::InstallCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::InstallerConfig;
use crate::constants::{CONFIG_ENV_VAR, DEFAULT_OS_RELEASE};

/// Log filter used when neither `RUST_LOG` nor a verbosity flag is given.
pub const DEFAULT_LOG_FILTER: &str = "warn,tac_installer=info";

/// Settings derived from the global flags, shared by every command.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Filter directive for the log subscriber; `RUST_LOG` takes precedence.
    pub log_filter: String,
    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
    /// OS identification file.
    pub os_release: PathBuf,
    /// Whether graphical dialogs may be used.
    pub gui: bool,
    /// Whether progress bars and status lines are shown.
    pub show_progress: bool,
    /// Suppress everything but errors.
    pub quiet: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            config_path: None,
            os_release: PathBuf::from(DEFAULT_OS_RELEASE),
            gui: true,
            show_progress: true,
            quiet: false,
        }
    }
}

/// Installer for TAC Writer on Linux distributions.
#[derive(Parser, Debug)]
#[command(
    name = "tac-installer",
    about = "Install and update TAC Writer on Linux",
    version,
    long_about = "Detects the Linux distribution, fetches the latest TAC Writer release and installs \
                  or updates it with the system package manager."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the installer configuration file.
    #[arg(short, long, global = true, env = CONFIG_ENV_VAR, value_name = "PATH")]
    config: Option<PathBuf>,

    /// OS identification file to read.
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_OS_RELEASE)]
    os_release: PathBuf,

    /// Ask questions in the terminal instead of graphical dialogs.
    #[arg(long, global = true)]
    no_gui: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install or update the application (default)
    Install(InstallCommand),
    /// Compare the installed version with the latest release
    Check(CheckCommand),
    /// Show the detected distribution and package plan
    Detect(DetectCommand),
}

impl Default for Commands {
    fn default() -> Self {
        Self::Install(InstallCommand::default())
    }
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(&config);
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_filter = if self.verbose {
            "debug".to_string()
        } else if self.quiet {
            "error".to_string()
        } else {
            DEFAULT_LOG_FILTER.to_string()
        };

        CliConfig {
            log_filter,
            config_path: self.config.clone(),
            os_release: self.os_release.clone(),
            gui: !self.no_gui,
            show_progress: !self.quiet,
            quiet: self.quiet,
        }
    }

    /// Run the selected command with an explicit [`CliConfig`].
    pub async fn execute_with_config(self, cli: CliConfig) -> Result<()> {
        let config = InstallerConfig::load(cli.config_path.as_deref()).await?;

        match self.command.unwrap_or_default() {
            Commands::Install(cmd) => cmd.execute(&config, &cli).await,
            Commands::Check(cmd) => cmd.execute(&config, &cli).await,
            Commands::Detect(cmd) => cmd.execute(&config, &cli),
        }
    }
}

/// Install the global log subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the filter derived from the flags. Calling this twice is harmless.
pub fn init_logging(cli: &CliConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_install() {
        let cli = Cli::parse_from(["tac-installer"]);
        assert!(cli.command.is_none());
        assert!(matches!(Commands::default(), Commands::Install(InstallCommand { yes: false })));
    }

    #[test]
    fn test_build_config_verbosity() {
        let cli = Cli::parse_from(["tac-installer", "--verbose", "check"]);
        assert_eq!(cli.build_config().log_filter, "debug");

        let cli = Cli::parse_from(["tac-installer", "install", "-q"]);
        let config = cli.build_config();
        assert_eq!(config.log_filter, "error");
        assert!(config.quiet);
        assert!(!config.show_progress);

        let cli = Cli::parse_from(["tac-installer"]);
        assert_eq!(cli.build_config().log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["tac-installer", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_global_paths_and_gui() {
        let cli = Cli::parse_from([
            "tac-installer",
            "detect",
            "--os-release",
            "/tmp/os-release",
            "--no-gui",
            "-c",
            "/tmp/config.toml",
        ]);
        let config = cli.build_config();
        assert_eq!(config.os_release, PathBuf::from("/tmp/os-release"));
        assert_eq!(config.config_path, Some(PathBuf::from("/tmp/config.toml")));
        assert!(!config.gui);
        assert!(matches!(cli.command, Some(Commands::Detect(_))));
    }

    #[test]
    fn test_install_yes_flag() {
        let cli = Cli::parse_from(["tac-installer", "install", "--yes"]);
        assert!(matches!(cli.command, Some(Commands::Install(InstallCommand { yes: true }))));
    }
}
