//! Core types shared by every part of the installer.
//!
//! Currently this is the error layer: [`InstallerError`] for typed failures and
//! [`ErrorContext`] / [`user_friendly_error`] for presenting them in a terminal.

pub mod error;

pub use error::{EXIT_FAILURE, ErrorContext, InstallerError, user_friendly_error};
