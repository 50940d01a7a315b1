//! `detect`: show what the installer would do on this machine, without network access.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::CliConfig;
use crate::config::{ArchDelivery, InstallerConfig};
use crate::distro::{DistroIdentity, DistroProbe};
use crate::policy::{DistroFamily, PackagePlan, PackagePolicy};

/// Show the detected distribution and the package plan for it.
#[derive(Args, Debug, Default, Clone)]
pub struct DetectCommand {
    /// Print machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl DetectCommand {
    /// Print the identity and plan. Fails when the distribution is unsupported.
    pub fn execute(self, config: &InstallerConfig, cli: &CliConfig) -> Result<()> {
        let identity = DistroProbe::new(&cli.os_release).identify();
        let plan = PackagePolicy::from_config(config).resolve(&identity);

        if self.json {
            let value = serde_json::json!({
                "id": identity.id,
                "id_like": identity.id_like,
                "pretty_name": identity.pretty_name,
                "family": plan.as_ref().ok().map(|plan| plan.family.to_string()),
                "archive_suffix": plan.as_ref().ok().map(|plan| plan.archive_suffix.clone()),
                "install_command": plan.as_ref().ok().map(|plan| plan.install_command.join(" ")),
                "pre_install_step": plan
                    .as_ref()
                    .ok()
                    .and_then(|plan| plan.pre_install_step.as_ref().map(|step| step.join(" "))),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            print_identity(&identity);
            if let Ok(plan) = &plan {
                print_plan(plan, config);
            }
        }

        plan?;
        Ok(())
    }
}

pub(crate) fn print_identity(identity: &DistroIdentity) {
    println!("{} {}", "Distribution:".bold(), identity.display_name());
    println!("  ID:      {}", empty_as_dash(&identity.id));
    println!("  ID_LIKE: {}", empty_as_dash(&identity.id_like));
}

pub(crate) fn print_plan(plan: &PackagePlan, config: &InstallerConfig) {
    println!("{} {}", "Family:".bold(), plan.family.to_string().cyan());
    if plan.family == DistroFamily::Arch && config.arch.delivery == ArchDelivery::Aur {
        println!("  Delivery: AUR build of {}", config.app_name);
        return;
    }
    println!("  Asset:    *{}", plan.archive_suffix);
    println!("  Install:  pkexec {} <file>", plan.install_command.join(" "));
    if let Some(step) = &plan.pre_install_step {
        println!("  Before:   pkexec {}", step.join(" "));
    }
}

fn empty_as_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
