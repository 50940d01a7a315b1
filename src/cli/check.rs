//! `check`: compare the installed version with the latest release. Never installs.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::CliConfig;
use crate::cli::detect::{print_identity, print_plan};
use crate::config::InstallerConfig;
use crate::distro::DistroProbe;
use crate::policy::PackagePolicy;
use crate::release::{ReleaseClient, ReleaseFeed};
use crate::state::{InstallStateStore, installed_version, is_installed};
use crate::system::SystemExecutor;
use crate::version::VersionComparator;

/// Report whether an update is available.
#[derive(Args, Debug, Default, Clone)]
pub struct CheckCommand {}

impl CheckCommand {
    /// Fetch the latest release and print the comparison.
    pub async fn execute(self, config: &InstallerConfig, cli: &CliConfig) -> Result<()> {
        let identity = DistroProbe::new(&cli.os_release).identify();
        print_identity(&identity);
        match PackagePolicy::from_config(config).resolve(&identity) {
            Ok(plan) => print_plan(&plan, config),
            Err(_) => println!("{} {}", "Family:".bold(), "unsupported".red()),
        }

        let release = ReleaseClient::new(config)?.latest().await?;
        let latest = release.version();

        let installed = is_installed(&config.install);
        let store = InstallStateStore::from_config(config);
        let executor = SystemExecutor::new(config);
        let version = if installed {
            installed_version(&store, &identity, &executor, &config.app_name).await
        } else {
            None
        };

        println!();
        println!("{} {}", "Latest release:".bold(), latest);
        if installed {
            println!(
                "{} {}",
                "Installed:".bold(),
                version.as_deref().unwrap_or("yes (version unknown)")
            );
            if VersionComparator::needs_update(version.as_deref(), latest) {
                println!("{}", "An update is available.".yellow());
            } else {
                println!("{}", "Up to date.".green());
            }
        } else {
            println!("{} no", "Installed:".bold());
        }
        Ok(())
    }
}
