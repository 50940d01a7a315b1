//! Shared helpers for the installer.
//!
//! # Modules
//!
//! - [`fs`] - directory creation and atomic file writes
//! - [`platform`] - executable lookup and desktop session detection
//! - [`progress`] - download progress bars

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, safe_write};
pub use platform::{command_exists, has_graphical_session};
pub use progress::TransferProgress;
