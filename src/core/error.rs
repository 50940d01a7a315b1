//! Error handling for the installer
//!
//! Errors come in two layers, mirroring how they reach the user:
//! 1. [`InstallerError`] - strongly-typed failures raised by the install workflow
//! 2. [`ErrorContext`] - a terminal-friendly wrapper that adds details and a suggestion
//!
//! # Error Categories
//!
//! - **Fatal workflow errors**: [`InstallerError::Network`], [`InstallerError::UnsupportedDistro`],
//!   [`InstallerError::AssetNotFound`], [`InstallerError::DownloadFailed`]
//! - **Install failure**: [`InstallerError::InstallCommandFailed`] is reported in a dialog and
//!   turns into a non-zero exit status without crashing
//! - **Environment problems**: [`InstallerError::DialogUnavailable`], [`InstallerError::Config`],
//!   [`InstallerError::Io`]
//!
//! A failed dependency step is not an error at all: the orchestrator logs it and carries on.
//! A missing version marker is not an error either; it simply means "unknown version".
//!
//! # Examples
//!
//! ```rust,no_run
//! use tac_installer::core::{InstallerError, user_friendly_error};
//!
//! let error = InstallerError::AssetNotFound { suffix: ".deb".to_string() };
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display(); // colored error, details and suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Exit status used for every fatal path.
pub const EXIT_FAILURE: i32 = 1;

/// The main error type for installer operations.
#[derive(Error, Debug)]
pub enum InstallerError {
    /// The release feed was unreachable, answered with a non-200 status,
    /// or returned a body that could not be decoded.
    #[error("Network error: {operation}")]
    Network {
        /// What the installer was trying to do
        operation: String,
        /// Underlying cause as reported by the HTTP layer
        reason: String,
    },

    /// No package policy matches the detected distribution.
    #[error("Unsupported distribution '{id}'")]
    UnsupportedDistro {
        /// Normalized `ID` from os-release (may be empty)
        id: String,
        /// Human-readable `PRETTY_NAME` from os-release (may be empty)
        pretty_name: String,
    },

    /// The release carries no x86_64 asset with the expected suffix.
    #[error("No release asset ending in '{suffix}' was found")]
    AssetNotFound {
        /// Archive suffix required by the package plan
        suffix: String,
    },

    /// Downloading the selected asset failed.
    #[error("Failed to download {url}")]
    DownloadFailed {
        /// Asset URL
        url: String,
        /// Underlying cause
        reason: String,
    },

    /// The privileged package manager invocation reported failure.
    #[error("Installation failed or was cancelled: {command}")]
    InstallCommandFailed {
        /// The command line that failed, for diagnostics
        command: String,
    },

    /// Neither a dialog tool nor a way to install one is available.
    #[error("Dialog tool unavailable: {reason}")]
    DialogUnavailable {
        /// Why the dialog tool could not be provided
        reason: String,
    },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// IO error from the standard library.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error("{message}")]
    Other {
        /// The message to show
        message: String,
    },
}

impl InstallerError {
    /// Text shown in the graphical error dialog before the installer terminates.
    ///
    /// Unlike [`Display`](fmt::Display), this includes the underlying cause so the
    /// user sees the same information the terminal would show.
    #[must_use]
    pub fn dialog_message(&self) -> String {
        match self {
            Self::Network {
                operation,
                reason,
            } => format!("Could not {operation}:\n{reason}"),
            Self::UnsupportedDistro {
                id,
                pretty_name,
            } => {
                let name = if pretty_name.is_empty() {
                    id.as_str()
                } else {
                    pretty_name.as_str()
                };
                if name.is_empty() {
                    "Unsupported distribution".to_string()
                } else {
                    format!("Unsupported distribution: {name}")
                }
            }
            Self::AssetNotFound {
                suffix,
            } => format!("No {suffix} file was found in the latest release"),
            Self::DownloadFailed {
                reason,
                ..
            } => format!("Download error:\n{reason}"),
            Self::InstallCommandFailed {
                ..
            } => "Installation failed or the operation was cancelled.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error wrapper with optional details and suggestion for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying installer error
    pub error: InstallerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: InstallerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with an actionable suggestion.
///
/// Recognizes [`InstallerError`] (also when wrapped in `anyhow` context),
/// [`std::io::Error`] and [`toml::de::Error`]; everything else is reported
/// with its full context chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<InstallerError>() {
        Ok(installer_error) => return create_error_context(installer_error),
        Err(error) => error,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(InstallerError::Other {
                    message: format!("Permission denied: {error}"),
                })
                .with_suggestion("Check file ownership or run the installer as the desktop user");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(InstallerError::Other {
                    message: format!("{error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if error.downcast_ref::<toml::de::Error>().is_some() {
        return ErrorContext::new(InstallerError::Config {
            message: format!("{error}"),
        })
        .with_details(format!("{error:#}"))
        .with_suggestion("Fix the TOML syntax in the installer configuration file");
    }

    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let context = ErrorContext::new(InstallerError::Other {
        message: error.to_string(),
    });
    if chain.is_empty() {
        context
    } else {
        context.with_details(chain.join(": "))
    }
}

fn create_error_context(error: InstallerError) -> ErrorContext {
    match &error {
        InstallerError::Network {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_details(reason)
                .with_suggestion("Check your internet connection and try again in a few minutes")
        }
        InstallerError::UnsupportedDistro {
            pretty_name,
            ..
        } => {
            let details = if pretty_name.is_empty() {
                "The distribution could not be identified from os-release".to_string()
            } else {
                format!("Detected system: {pretty_name}")
            };
            ErrorContext::new(error).with_details(details).with_suggestion(
                "Supported families are Arch, Debian/Ubuntu, Fedora and openSUSE; install the package manually",
            )
        }
        InstallerError::AssetNotFound {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "The latest release has no x86_64 package for this system; check the project's release page",
        ),
        InstallerError::DownloadFailed {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_details(reason)
                .with_suggestion("Check your internet connection and free space in the temp directory")
        }
        InstallerError::InstallCommandFailed {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Make sure you entered the administrator password and that no other package manager is running",
        ),
        InstallerError::DialogUnavailable {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Install 'zenity' manually or run with --no-gui for terminal prompts"),
        InstallerError::Config {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the file passed with --config or TAC_INSTALLER_CONFIG"),
        InstallerError::Io(_) | InstallerError::Other {
            ..
        } => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let error = InstallerError::AssetNotFound {
            suffix: ".rpm".to_string(),
        };
        assert_eq!(error.to_string(), "No release asset ending in '.rpm' was found");

        let error = InstallerError::UnsupportedDistro {
            id: "unknownos".to_string(),
            pretty_name: String::new(),
        };
        assert_eq!(error.to_string(), "Unsupported distribution 'unknownos'");
    }

    #[test]
    fn test_dialog_message_includes_reason() {
        let error = InstallerError::Network {
            operation: "check for updates".to_string(),
            reason: "operation timed out".to_string(),
        };
        assert_eq!(error.dialog_message(), "Could not check for updates:\noperation timed out");
    }

    #[test]
    fn test_dialog_message_prefers_pretty_name() {
        let error = InstallerError::UnsupportedDistro {
            id: "gentoo".to_string(),
            pretty_name: "Gentoo Linux".to_string(),
        };
        assert_eq!(error.dialog_message(), "Unsupported distribution: Gentoo Linux");

        let error = InstallerError::UnsupportedDistro {
            id: String::new(),
            pretty_name: String::new(),
        };
        assert_eq!(error.dialog_message(), "Unsupported distribution");
    }

    #[test]
    fn test_user_friendly_error_downcasts_through_context() {
        let error: anyhow::Result<()> = Err(InstallerError::AssetNotFound {
            suffix: ".deb".to_string(),
        })
        .context("while preparing the download");

        let context = user_friendly_error(error.unwrap_err());
        assert!(matches!(context.error, InstallerError::AssetNotFound { .. }));
        assert!(context.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_generic() {
        let context = user_friendly_error(anyhow::anyhow!("something broke"));
        assert_eq!(context.error.to_string(), "something broke");
        assert!(context.details.is_none());
    }

    #[test]
    fn test_error_context_display() {
        let context = ErrorContext::new(InstallerError::Other {
            message: "boom".to_string(),
        })
        .with_details("it exploded")
        .with_suggestion("try again");

        assert_eq!(context.to_string(), "boom\nDetails: it exploded\nSuggestion: try again");
    }
}
