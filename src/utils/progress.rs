//! Download progress reporting.
//!
//! Wraps `indicatif` with the installer's styling. Bars are hidden when stderr is
//! not a terminal or when `TAC_INSTALLER_NO_PROGRESS` is set, so scripted runs
//! and tests produce clean output.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Environment variable that disables progress bars.
pub const NO_PROGRESS_ENV_VAR: &str = "TAC_INSTALLER_NO_PROGRESS";

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV_VAR).is_some() || !std::io::stderr().is_terminal()
}

fn download_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸━")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{prefix:.bold.cyan} {spinner:.cyan} {bytes} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

/// Progress of a single file transfer.
///
/// Shows a byte bar when the total size is known and a spinner otherwise.
#[derive(Clone)]
pub struct TransferProgress {
    inner: ProgressBar,
}

impl TransferProgress {
    /// Start tracking a transfer labelled `prefix`.
    pub fn new(prefix: impl Into<String>, total: Option<u64>) -> Self {
        let inner = if is_progress_disabled() {
            ProgressBar::hidden()
        } else {
            match total {
                Some(len) => ProgressBar::new(len).with_style(download_style()),
                None => {
                    let bar = ProgressBar::new_spinner().with_style(spinner_style());
                    bar.enable_steady_tick(std::time::Duration::from_millis(100));
                    bar
                }
            }
        };
        inner.set_prefix(prefix.into());
        Self {
            inner,
        }
    }

    /// A bar that never draws.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            inner: ProgressBar::hidden(),
        }
    }

    /// Record `delta` more transferred bytes.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Bytes recorded so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Remove the bar from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_counts_bytes() {
        let progress = TransferProgress::hidden();
        progress.inc(512);
        progress.inc(512);
        assert_eq!(progress.position(), 1024);
        progress.finish_and_clear();
    }

    #[test]
    fn test_new_without_total() {
        let progress = TransferProgress::new("download", None);
        progress.inc(10);
        assert_eq!(progress.position(), 10);
        progress.finish_and_clear();
    }
}
