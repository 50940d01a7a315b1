//! `install`: run the install/update workflow.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::debug;

use crate::cli::CliConfig;
use crate::config::InstallerConfig;
use crate::core::InstallerError;
use crate::distro::DistroProbe;
use crate::orchestrator::{InstallOrchestrator, Outcome};
use crate::release::ReleaseClient;
use crate::system::{
    AssumeYes, DialogBackend, HttpDownloader, Prompter, SystemExecutor, TerminalPrompter,
    ZenityPrompter, ensure_zenity,
};
use crate::utils::has_graphical_session;

/// Install the application, or update it when a newer release exists.
#[derive(Args, Debug, Default, Clone)]
pub struct InstallCommand {
    /// Answer yes to every question (unattended install).
    #[arg(short, long)]
    pub yes: bool,
}

impl InstallCommand {
    /// Execute the install workflow.
    pub async fn execute(self, config: &InstallerConfig, cli: &CliConfig) -> Result<()> {
        let probe = DistroProbe::new(&cli.os_release);
        let prompter = select_prompter(config, cli, &probe).await?;
        let feed = ReleaseClient::new(config)?;
        let executor = SystemExecutor::new(config);
        let downloader = HttpDownloader::new(config)?.with_progress(cli.show_progress);

        let outcome = if self.yes {
            let prompter = AssumeYes::new(prompter);
            run(config, &probe, &feed, &prompter, &executor, &downloader).await?
        } else {
            run(config, &probe, &feed, &prompter, &executor, &downloader).await?
        };

        if !cli.quiet {
            let line = outcome.to_string();
            match outcome {
                Outcome::Declined => println!("{}", line.yellow()),
                Outcome::UpToDate { .. } | Outcome::Installed { .. } => {
                    println!("{}", line.green());
                }
            }
        }
        Ok(())
    }
}

async fn run<P: Prompter>(
    config: &InstallerConfig,
    probe: &DistroProbe,
    feed: &ReleaseClient,
    prompter: &P,
    executor: &SystemExecutor,
    downloader: &HttpDownloader,
) -> Result<Outcome, InstallerError> {
    InstallOrchestrator::new(config, probe, feed, prompter, executor, downloader).run().await
}

/// Zenity when a desktop session is available and allowed, the terminal otherwise.
///
/// Zenity is installed on demand; failing that is fatal in GUI mode.
async fn select_prompter(
    config: &InstallerConfig,
    cli: &CliConfig,
    probe: &DistroProbe,
) -> Result<DialogBackend, InstallerError> {
    if !cli.gui {
        debug!("Graphical dialogs disabled, prompting in the terminal");
        return Ok(DialogBackend::Terminal(TerminalPrompter::new()));
    }
    if !has_graphical_session() {
        debug!("No graphical session, prompting in the terminal");
        return Ok(DialogBackend::Terminal(TerminalPrompter::new()));
    }

    ensure_zenity(&probe.identify()).await?;
    Ok(DialogBackend::Zenity(ZenityPrompter::new(&config.dialog)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_gui_selects_terminal() {
        let cli = CliConfig {
            gui: false,
            ..CliConfig::default()
        };
        let probe = DistroProbe::new("/nonexistent/os-release");
        let prompter = select_prompter(&InstallerConfig::default(), &cli, &probe).await.unwrap();
        assert!(matches!(prompter, DialogBackend::Terminal(_)));
    }
}
