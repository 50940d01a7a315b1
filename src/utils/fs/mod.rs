//! File system helpers.
//!
//! The installer writes exactly one file of its own (the version marker), so the
//! surface here is small: [`ensure_dir`] and the temp-and-rename writers.

pub mod atomic;
pub mod dirs;

pub use atomic::{atomic_write, safe_write};
pub use dirs::{ensure_dir, ensure_parent_dir};
