//! Test utilities for the installer.
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests under `tests/`.
//!
//! - [`fakes`] - recording implementations of the collaborator traits
//! - [`fixtures`] - temporary install trees, os-release files and releases

pub mod fakes;
pub mod fixtures;

pub use fakes::{FakeDownloader, FakeExecutor, FakeFeed, FakePrompter};
pub use fixtures::{InstallerFixture, release};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays off.
/// Safe to call from every test, only the first call has an effect.
///
/// ```bash
/// RUST_LOG=tac_installer=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
