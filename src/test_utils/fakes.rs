//! Recording fakes for [`ReleaseFeed`], [`Prompter`], [`Executor`] and [`Downloader`].
//!
//! Each fake is `Clone` and shares its recorded state between clones, so a test
//! can hand one clone to the code under test and inspect another.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::InstallerError;
use crate::release::{ReleaseFeed, ReleaseInfo};
use crate::system::{Downloader, Executor, Prompter};

/// Release feed returning a fixed release or a fixed network failure.
#[derive(Debug, Clone)]
pub struct FakeFeed {
    release: Option<ReleaseInfo>,
    failure: String,
    calls: Arc<AtomicUsize>,
}

impl FakeFeed {
    /// Feed serving `release`.
    #[must_use]
    pub fn serving(release: ReleaseInfo) -> Self {
        Self {
            release: Some(release),
            failure: String::new(),
            calls: Arc::default(),
        }
    }

    /// Feed failing every request with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            release: None,
            failure: reason.into(),
            calls: Arc::default(),
        }
    }

    /// Number of fetches so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReleaseFeed for FakeFeed {
    async fn latest(&self) -> Result<ReleaseInfo, InstallerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.clone().ok_or_else(|| InstallerError::Network {
            operation: "fetch the latest release".to_string(),
            reason: self.failure.clone(),
        })
    }
}

/// Prompter answering from a queue; an exhausted queue answers "no".
#[derive(Debug, Clone, Default)]
pub struct FakePrompter {
    answers: Arc<Mutex<VecDeque<bool>>>,
    confirmations: Arc<Mutex<Vec<(String, String)>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl FakePrompter {
    /// Prompter giving `answers` in order.
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Every `(title, body)` asked, in order.
    #[must_use]
    pub fn confirmations(&self) -> Vec<(String, String)> {
        self.confirmations.lock().unwrap().clone()
    }

    /// Titles of every question asked, in order.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.confirmations().into_iter().map(|(title, _)| title).collect()
    }

    /// Every error message shown, in order.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Prompter for FakePrompter {
    async fn confirm(&self, title: &str, body: &str) -> bool {
        self.confirmations.lock().unwrap().push((title.to_string(), body.to_string()));
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }

    async fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[derive(Debug, Default)]
struct ExecutorLog {
    commands: Vec<Vec<String>>,
    package_queries: Vec<String>,
    aur_builds: Vec<String>,
    launches: usize,
}

/// Executor recording every call.
///
/// Privileged commands succeed unless an outcome queue says otherwise.
#[derive(Debug, Clone)]
pub struct FakeExecutor {
    outcomes: Arc<Mutex<VecDeque<bool>>>,
    package_version: Arc<Mutex<Option<String>>>,
    version_after_aur_build: Option<String>,
    aur_result: bool,
    launch_result: bool,
    log: Arc<Mutex<ExecutorLog>>,
}

impl Default for FakeExecutor {
    fn default() -> Self {
        Self {
            outcomes: Arc::default(),
            package_version: Arc::default(),
            version_after_aur_build: None,
            aur_result: true,
            launch_result: true,
            log: Arc::default(),
        }
    }
}

impl FakeExecutor {
    /// Executor where everything succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Results for successive privileged commands; later commands succeed.
    #[must_use]
    pub fn with_outcomes(self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        *self.outcomes.lock().unwrap() = outcomes.into_iter().collect();
        self
    }

    /// Version the package manager reports.
    #[must_use]
    pub fn with_package_version(self, version: impl Into<String>) -> Self {
        *self.package_version.lock().unwrap() = Some(version.into());
        self
    }

    /// Version the package manager reports once an AUR build succeeded.
    #[must_use]
    pub fn with_version_after_aur_build(mut self, version: impl Into<String>) -> Self {
        self.version_after_aur_build = Some(version.into());
        self
    }

    /// Result of AUR builds.
    #[must_use]
    pub const fn with_aur_result(mut self, result: bool) -> Self {
        self.aur_result = result;
        self
    }

    /// Result of launches.
    #[must_use]
    pub const fn with_launch_result(mut self, result: bool) -> Self {
        self.launch_result = result;
        self
    }

    /// Privileged argv vectors run so far.
    #[must_use]
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.log.lock().unwrap().commands.clone()
    }

    /// Packages queried from the package manager.
    #[must_use]
    pub fn package_queries(&self) -> Vec<String> {
        self.log.lock().unwrap().package_queries.clone()
    }

    /// Packages built from the AUR.
    #[must_use]
    pub fn aur_builds(&self) -> Vec<String> {
        self.log.lock().unwrap().aur_builds.clone()
    }

    /// Number of launch attempts.
    #[must_use]
    pub fn launches(&self) -> usize {
        self.log.lock().unwrap().launches
    }
}

impl Executor for FakeExecutor {
    async fn run_privileged(&self, argv: &[String]) -> bool {
        self.log.lock().unwrap().commands.push(argv.to_vec());
        self.outcomes.lock().unwrap().pop_front().unwrap_or(true)
    }

    async fn installed_package_version(&self, package: &str) -> Option<String> {
        self.log.lock().unwrap().package_queries.push(package.to_string());
        self.package_version.lock().unwrap().clone()
    }

    async fn build_from_aur(&self, package: &str) -> bool {
        self.log.lock().unwrap().aur_builds.push(package.to_string());
        if self.aur_result {
            if let Some(version) = &self.version_after_aur_build {
                *self.package_version.lock().unwrap() = Some(version.clone());
            }
        }
        self.aur_result
    }

    async fn launch(&self) -> bool {
        self.log.lock().unwrap().launches += 1;
        self.launch_result
    }
}

/// Downloader writing a small placeholder file instead of fetching.
#[derive(Debug, Clone, Default)]
pub struct FakeDownloader {
    failure: Option<String>,
    downloads: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl FakeDownloader {
    /// Downloader where every download succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Downloader failing every download with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Every `(url, destination)` requested, in order.
    #[must_use]
    pub fn downloads(&self) -> Vec<(String, PathBuf)> {
        self.downloads.lock().unwrap().clone()
    }
}

impl Downloader for FakeDownloader {
    async fn download(&self, url: &str, destination: &Path) -> Result<(), InstallerError> {
        self.downloads.lock().unwrap().push((url.to_string(), destination.to_path_buf()));
        if let Some(reason) = &self.failure {
            return Err(InstallerError::DownloadFailed {
                url: url.to_string(),
                reason: reason.clone(),
            });
        }
        tokio::fs::write(destination, b"package").await?;
        Ok(())
    }
}
