//! Integration test suite for tac-installer
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **cli**: the `detect` command end to end against fixture os-release and config files
//! - **workflow**: several orchestrator runs in a row through the public API and fakes

mod cli;
mod workflow;
