//! Human-readable release summaries for the install confirmation.
//!
//! Dialog text uses Pango markup (zenity renders it), so release notes are
//! escaped before they are embedded.

use chrono::DateTime;

use crate::distro::DistroIdentity;
use crate::release::ReleaseInfo;

/// Maximum number of characters of release notes shown in the dialog.
pub const MAX_RELEASE_NOTES_CHARS: usize = 1000;

/// Shown instead of empty release notes.
pub const EMPTY_NOTES_PLACEHOLDER: &str = "No description provided.";

/// Appended when release notes were truncated.
pub const SEE_MORE_SUFFIX: &str = "\n\n... (see more on GitHub)";

/// Escape the characters that are special in Pango markup.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Trim, cap and escape release notes for display.
///
/// Empty notes become [`EMPTY_NOTES_PLACEHOLDER`]; notes longer than
/// [`MAX_RELEASE_NOTES_CHARS`] are cut there and get [`SEE_MORE_SUFFIX`].
/// The cap applies to the raw text, so a cut never splits an entity.
#[must_use]
pub fn format_release_notes(body: &str) -> String {
    let trimmed = body.trim();

    if trimmed.is_empty() {
        return EMPTY_NOTES_PLACEHOLDER.to_string();
    }

    match trimmed.char_indices().nth(MAX_RELEASE_NOTES_CHARS) {
        Some((cut, _)) => format!("{}{SEE_MORE_SUFFIX}", escape_markup(&trimmed[..cut])),
        None => escape_markup(trimmed),
    }
}

/// Format an RFC 3339 timestamp as day/month/year; anything unparsable is returned verbatim.
#[must_use]
pub fn format_publish_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Body of the "install now?" confirmation.
#[must_use]
pub fn install_summary(app_name: &str, release: &ReleaseInfo, identity: &DistroIdentity) -> String {
    let date = escape_markup(&format_publish_date(
        release.published_at.as_deref().unwrap_or_default(),
    ));
    let notes = format_release_notes(release.body());

    format!(
        "<b>{app}</b> will be installed on your computer.\n\n\
         <b>Version</b>: {version}\n\
         <b>Released</b>: {date}\n\
         <b>System</b>: {system}\n\n\
         <b>What's new:</b>\n<span size='small'>{notes}</span>\n\n\
         Do you want to continue?",
        app = escape_markup(app_name),
        version = escape_markup(release.version()),
        system = escape_markup(identity.display_name()),
    )
}
