//! tac-installer - installs and updates TAC Writer on Linux
//!
//! A small bootstrapper that works out which distribution it runs on, asks the
//! GitHub releases feed for the newest TAC Writer build, and installs or updates
//! it through the distribution's package manager.
//!
//! # Workflow
//!
//! 1. Identify the distribution from `/etc/os-release` ([`distro`])
//! 2. Check whether the application is installed and at which version ([`state`])
//! 3. Fetch the latest release and compare versions ([`release`], [`version`])
//! 4. Pick the asset and install command for the distribution family ([`policy`])
//! 5. Confirm with the user, download, install and record the version ([`orchestrator`])
//!
//! Every side effect (dialogs, privileged commands, downloads) goes through the
//! traits in [`system`], so the workflow in [`orchestrator`] runs unchanged against
//! the fakes in `test_utils`.
//!
//! # Modules
//!
//! - [`cli`] - `install`, `check` and `detect` commands
//! - [`config`] - optional TOML configuration
//! - [`core`] - error types and user-facing error display
//! - [`utils`] - filesystem, platform and progress helpers

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod distro;
pub mod orchestrator;
pub mod policy;
pub mod release;
pub mod state;
pub mod system;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
