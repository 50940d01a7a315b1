//! Side-effecting collaborators of the install workflow.
//!
//! The orchestrator talks to the outside world only through three narrow traits:
//!
//! - [`Prompter`] - yes/no confirmations and error reports
//! - [`Executor`] - privileged package manager calls, launching the app, AUR builds
//! - [`Downloader`] - fetching a release asset to a local path
//!
//! Production implementations live in the submodules; recording fakes live in
//! `test_utils`.

pub mod command;
pub mod download;
pub mod executor;
pub mod terminal;
pub mod zenity;

use std::future::Future;
use std::path::Path;
use tracing::info;

use crate::core::InstallerError;

pub use command::SystemCommand;
pub use download::HttpDownloader;
pub use executor::SystemExecutor;
pub use terminal::TerminalPrompter;
pub use zenity::{ZenityPrompter, ensure_zenity};

/// Asks the user questions and reports errors.
pub trait Prompter {
    /// Ask a yes/no question; `true` means yes. Bodies may contain Pango markup.
    fn confirm(&self, title: &str, body: &str) -> impl Future<Output = bool> + Send;

    /// Report an error. Returns once the user has seen it.
    fn error(&self, message: &str) -> impl Future<Output = ()> + Send;
}

/// Runs the installer's system effects.
pub trait Executor {
    /// Run `argv` with elevated privileges; `true` on success.
    fn run_privileged(&self, argv: &[String]) -> impl Future<Output = bool> + Send;

    /// Version of `package` as reported by the system package manager, if installed.
    fn installed_package_version(
        &self,
        package: &str,
    ) -> impl Future<Output = Option<String>> + Send;

    /// Build and install `package` from the AUR; `true` when it ends up installed.
    fn build_from_aur(&self, package: &str) -> impl Future<Output = bool> + Send;

    /// Start the installed application without waiting for it; `true` if it started.
    fn launch(&self) -> impl Future<Output = bool> + Send;
}

/// Fetches release assets.
pub trait Downloader {
    /// Download `url` to `destination`.
    fn download(
        &self,
        url: &str,
        destination: &Path,
    ) -> impl Future<Output = Result<(), InstallerError>> + Send;
}

/// The prompter selected at startup.
#[derive(Debug, Clone)]
pub enum DialogBackend {
    /// Graphical dialogs through zenity.
    Zenity(ZenityPrompter),
    /// Plain stdin/stderr prompts.
    Terminal(TerminalPrompter),
}

impl Prompter for DialogBackend {
    async fn confirm(&self, title: &str, body: &str) -> bool {
        match self {
            Self::Zenity(prompter) => prompter.confirm(title, body).await,
            Self::Terminal(prompter) => prompter.confirm(title, body).await,
        }
    }

    async fn error(&self, message: &str) {
        match self {
            Self::Zenity(prompter) => prompter.error(message).await,
            Self::Terminal(prompter) => prompter.error(message).await,
        }
    }
}

/// Answers every confirmation with yes; errors still reach the wrapped prompter.
#[derive(Debug, Clone)]
pub struct AssumeYes<P> {
    inner: P,
}

impl<P> AssumeYes<P> {
    /// Wrap `inner`.
    pub const fn new(inner: P) -> Self {
        Self {
            inner,
        }
    }
}

impl<P: Prompter + Sync> Prompter for AssumeYes<P> {
    async fn confirm(&self, title: &str, _body: &str) -> bool {
        info!("Assuming yes for '{title}'");
        true
    }

    async fn error(&self, message: &str) {
        self.inner.error(message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakePrompter;

    #[tokio::test]
    async fn test_assume_yes_confirms_and_forwards_errors() {
        let inner = FakePrompter::answering([false]);
        let prompter = AssumeYes::new(inner.clone());

        assert!(prompter.confirm("Update", "body").await);
        prompter.error("boom").await;

        assert!(inner.confirmations().is_empty());
        assert_eq!(inner.errors(), vec!["boom".to_string()]);
    }
}
