//! Host environment queries.

use std::env;

/// Whether `cmd` resolves to an executable on `PATH`.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Whether a graphical session is reachable (X11 or Wayland).
///
/// Without one, dialogs cannot be shown and prompts fall back to the terminal.
#[must_use]
pub fn has_graphical_session() -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| env::var_os(var).is_some_and(|value| !value.is_empty()))
}
