//! The install/update workflow.
//!
//! [`InstallOrchestrator`] is a small state machine over [`Stage`]:
//!
//! ```text
//! Start → Detect ─┬─ NotInstalled → PromptInstall ──┐
//!                 └─ CheckUpdate ─┬─ PromptUpdate ──┤ (accepted)
//!                                 └─ PromptOpen     ▼
//!                                     Download → Install → Persist → PromptOpenAfter → End
//! ```
//!
//! Every fatal error moves to `Abort` after the user has been shown an error
//! dialog. A failed install command is reported the same way but ends in `End`:
//! the workflow ran to completion, it just did not succeed.
//!
//! Declining any prompt ends the run with [`Outcome::Declined`]. An accepted
//! update does not fetch the release again; it hands the release it already has
//! to the same apply path a fresh install uses.

use colored::Colorize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::{ArchDelivery, InstallerConfig};
use crate::core::InstallerError;
use crate::distro::{DistroIdentity, DistroProbe};
use crate::policy::{DistroFamily, PackagePlan, PackagePolicy};
use crate::release::notes::{escape_markup, install_summary};
use crate::release::{ReleaseFeed, ReleaseInfo};
use crate::state::{InstallStateStore, installed_version, is_installed};
use crate::system::{Downloader, Executor, Prompter};
use crate::version::VersionComparator;


/// A state of the install workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has happened yet.
    Start,
    /// Identifying the host distribution and checking for an existing install.
    Detect,
    /// The application is absent.
    NotInstalled,
    /// The application is present; comparing against the latest release.
    CheckUpdate,
    /// Asking whether to install.
    PromptInstall,
    /// Asking whether to update.
    PromptUpdate,
    /// Up to date; asking whether to open the application.
    PromptOpen,
    /// Fetching the release asset.
    Download,
    /// Running the package manager.
    Install,
    /// Recording the installed version.
    Persist,
    /// Installed; asking whether to open the application.
    PromptOpenAfter,
    /// Finished (successfully, declined, or with a reported install failure).
    End,
    /// Stopped by a fatal error.
    Abort,
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user said no; nothing was changed.
    Declined,
    /// The installed version is current.
    UpToDate {
        /// The latest released version
        version: String,
        /// Whether the application was started
        launched: bool,
    },
    /// A release was installed.
    Installed {
        /// The version now installed
        version: String,
        /// Whether the application was started
        launched: bool,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declined => write!(f, "Nothing to do: cancelled by the user"),
            Self::UpToDate {
                version,
                ..
            } => write!(f, "Already up to date ({version})"),
            Self::Installed {
                version,
                ..
            } => write!(f, "Installed version {version}"),
        }
    }
}

/// Drives a single install/update run.
///
/// The orchestrator owns the control flow only; every effect goes through the
/// borrowed collaborators, so the whole workflow runs against fakes in tests.
pub struct InstallOrchestrator<'a, F, P, E, D> {
    config: &'a InstallerConfig,
    probe: &'a DistroProbe,
    feed: &'a F,
    prompter: &'a P,
    executor: &'a E,
    downloader: &'a D,
    policy: PackagePolicy,
    store: InstallStateStore,
    history: Vec<Stage>,
}

impl<'a, F, P, E, D> InstallOrchestrator<'a, F, P, E, D>
where
    F: ReleaseFeed,
    P: Prompter,
    E: Executor,
    D: Downloader,
{
    /// Wire up a run.
    pub fn new(
        config: &'a InstallerConfig,
        probe: &'a DistroProbe,
        feed: &'a F,
        prompter: &'a P,
        executor: &'a E,
        downloader: &'a D,
    ) -> Self {
        Self {
            config,
            probe,
            feed,
            prompter,
            executor,
            downloader,
            policy: PackagePolicy::from_config(config),
            store: InstallStateStore::from_config(config),
            history: vec![Stage::Start],
        }
    }

    /// Stages visited so far, in order.
    #[must_use]
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// The stage the run is in (or ended in).
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.history.last().copied().unwrap_or(Stage::Start)
    }

    fn enter(&mut self, stage: Stage) {
        debug!("Stage {:?} -> {:?}", self.stage(), stage);
        self.history.push(stage);
    }

    /// Run the workflow to completion.
    ///
    /// Every error returned has already been shown to the user.
    pub async fn run(&mut self) -> Result<Outcome, InstallerError> {
        self.enter(Stage::Detect);
        let identity = self.probe.identify();
        info!("Running on {}", identity.display_name());

        let result = if is_installed(&self.config.install) {
            self.enter(Stage::CheckUpdate);
            self.check_update(&identity).await
        } else {
            self.enter(Stage::NotInstalled);
            self.fresh_install(&identity).await
        };

        match result {
            Ok(outcome) => {
                self.enter(Stage::End);
                info!("{outcome}");
                Ok(outcome)
            }
            Err(error) => self.fail(error).await,
        }
    }

    async fn fail(&mut self, error: InstallerError) -> Result<Outcome, InstallerError> {
        self.prompter.error(&error.dialog_message()).await;
        if matches!(error, InstallerError::InstallCommandFailed { .. }) {
            self.enter(Stage::End);
        } else {
            self.enter(Stage::Abort);
        }
        Err(error)
    }

    async fn check_update(&mut self, identity: &DistroIdentity) -> Result<Outcome, InstallerError> {
        let release = self.feed.latest().await?;
        let latest = release.version().to_string();
        let installed =
            installed_version(&self.store, identity, self.executor, &self.config.app_name).await;
        debug!("Installed version {installed:?}, latest {latest}");

        if !VersionComparator::needs_update(installed.as_deref(), &latest) {
            self.enter(Stage::PromptOpen);
            let body = format!(
                "<b>{}</b> is already installed and up to date.\n\nDo you want to open it?",
                escape_markup(&self.config.pretty_name)
            );
            let launched = self.offer_launch("Open", &body).await;
            return Ok(Outcome::UpToDate {
                version: latest,
                launched,
            });
        }

        self.enter(Stage::PromptUpdate);
        let body = format!(
            "Update available\n\n<b>Installed version</b>: {}\n<b>New version</b>: {}\n\nDo you want to update?",
            escape_markup(installed.as_deref().unwrap_or("unknown")),
            escape_markup(&latest)
        );
        let title = format!("Update {}", self.config.pretty_name);
        if !self.prompter.confirm(&title, &body).await {
            info!("Update to {latest} declined");
            return Ok(Outcome::Declined);
        }

        self.apply_release(identity, &release).await
    }

    async fn fresh_install(&mut self, identity: &DistroIdentity) -> Result<Outcome, InstallerError> {
        let release = self.feed.latest().await?;

        self.enter(Stage::PromptInstall);
        let body = install_summary(&self.config.pretty_name, &release, identity);
        if !self.prompter.confirm(&self.config.installer_title(), &body).await {
            info!("Installation declined");
            return Ok(Outcome::Declined);
        }

        self.apply_release(identity, &release).await
    }

    /// Download, install and record `release`. Shared by fresh installs and accepted updates.
    async fn apply_release(
        &mut self,
        identity: &DistroIdentity,
        release: &ReleaseInfo,
    ) -> Result<Outcome, InstallerError> {
        let plan = self.policy.resolve(identity)?;
        info!("Using the {} package plan", plan.family);

        if plan.family == DistroFamily::Arch && self.config.arch.delivery == ArchDelivery::Aur {
            return self.install_from_aur(release).await;
        }

        self.enter(Stage::Download);
        let asset = release.find_asset(&plan.archive_suffix).ok_or_else(|| {
            InstallerError::AssetNotFound {
                suffix: plan.archive_suffix.clone(),
            }
        })?;

        // Dropping the directory removes the download on every early return below.
        let download_dir = tempfile::Builder::new().prefix("tac-installer-").tempdir()?;
        let package = download_dir.path().join(&asset.name);
        self.downloader.download(&asset.url, &package).await?;

        self.enter(Stage::Install);
        let installed = self.install_package(&plan, &package).await;

        if let Err(e) = download_dir.close() {
            warn!("Failed to remove temporary download: {e}");
        }

        if !installed {
            return Err(InstallerError::InstallCommandFailed {
                command: plan.install_command.join(" "),
            });
        }

        self.persist_and_offer_launch(release.version()).await
    }

    async fn install_package(&self, plan: &PackagePlan, package: &std::path::Path) -> bool {
        if let Some(step) = &plan.pre_install_step {
            info!("Installing {} dependencies", plan.family);
            if !self.executor.run_privileged(step).await {
                warn!("Dependency installation failed or was cancelled; continuing");
                eprintln!(
                    "{}",
                    "Warning: failed to install dependencies or cancelled by the user.".yellow()
                );
            }
        }

        self.executor.run_privileged(&plan.install_argv(package)).await
    }

    async fn install_from_aur(&mut self, release: &ReleaseInfo) -> Result<Outcome, InstallerError> {
        let body = format!(
            "<b>Arch Linux</b> detected.\n\n<b>{}</b> will be installed from the <b>AUR</b> \
             so its dependencies are resolved automatically.\n\n\
             This opens a terminal to build the package.\nDo you want to continue?",
            escape_markup(&self.config.pretty_name)
        );
        if !self.prompter.confirm(&self.config.installer_title(), &body).await {
            info!("AUR build declined");
            return Ok(Outcome::Declined);
        }

        let config = self.config;
        let app = config.app_name.as_str();
        let before = self.executor.installed_package_version(app).await;

        self.enter(Stage::Install);
        let built = self.executor.build_from_aur(app).await;
        let after = if built { self.executor.installed_package_version(app).await } else { None };

        if !built || !aur_build_took_effect(before.as_deref(), after.as_deref(), release.version()) {
            return Err(InstallerError::InstallCommandFailed {
                command: format!("AUR build of {app}"),
            });
        }

        let version = after.unwrap_or_else(|| release.version().to_string());
        self.persist_and_offer_launch(&version).await
    }

    async fn persist_and_offer_launch(&mut self, version: &str) -> Result<Outcome, InstallerError> {
        self.enter(Stage::Persist);
        if let Err(e) = self.store.write(version) {
            warn!("{e:#}");
        }

        self.enter(Stage::PromptOpenAfter);
        let launched =
            self.offer_launch("Success", "Installation complete!\nDo you want to open it now?").await;

        Ok(Outcome::Installed {
            version: version.to_string(),
            launched,
        })
    }

    async fn offer_launch(&self, title: &str, body: &str) -> bool {
        if !self.prompter.confirm(title, body).await {
            return false;
        }
        let launched = self.executor.launch().await;
        if !launched {
            warn!("Could not open {}", self.config.pretty_name);
        }
        launched
    }
}

/// Whether an AUR build changed what pacman reports.
///
/// A package that was already present must now be a different version, or one
/// at least as new as `latest`; otherwise the build did nothing.
fn aur_build_took_effect(before: Option<&str>, after: Option<&str>, latest: &str) -> bool {
    match (before, after) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(before), Some(after)) => {
            after != before || !VersionComparator::needs_update(Some(after), latest)
        }
    }
}
