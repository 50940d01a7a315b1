//! Graphical dialogs through `zenity`.

use tracing::{info, warn};

use crate::config::DialogConfig;
use crate::constants::DIALOG_PROGRAM;
use crate::core::InstallerError;
use crate::distro::DistroIdentity;
use crate::policy::DistroFamily;
use crate::system::terminal::find_terminal;
use crate::system::{Prompter, SystemCommand};
use crate::utils::command_exists;

/// Yes/no and error dialogs rendered by zenity.
#[derive(Debug, Clone)]
pub struct ZenityPrompter {
    width: u32,
    error_width: u32,
}

impl ZenityPrompter {
    /// Prompter using the configured dialog sizes.
    #[must_use]
    pub const fn new(dialog: &DialogConfig) -> Self {
        Self {
            width: dialog.width,
            error_width: dialog.error_width,
        }
    }

    fn question_command(&self, title: &str, body: &str) -> SystemCommand {
        SystemCommand::new(DIALOG_PROGRAM)
            .arg("--question")
            .arg(format!("--title={title}"))
            .arg(format!("--text={body}"))
            .arg(format!("--width={}", self.width))
    }

    fn error_command(&self, message: &str) -> SystemCommand {
        SystemCommand::new(DIALOG_PROGRAM)
            .arg("--error")
            .arg(format!("--text={message}"))
            .arg(format!("--width={}", self.error_width))
    }
}

impl Prompter for ZenityPrompter {
    async fn confirm(&self, title: &str, body: &str) -> bool {
        // zenity exits 0 for "Yes", 1 for "No" or a closed window
        self.question_command(title, body).succeeds().await
    }

    async fn error(&self, message: &str) {
        if let Err(e) = self.error_command(message).execute().await {
            warn!("Could not show error dialog: {e:#}");
        }
    }
}

/// Bash script that installs zenity with `install_command` and reports the result.
#[must_use]
pub fn zenity_install_script(install_command: &str) -> String {
    format!(
        r#"#!/bin/bash
echo "=========================================="
echo " The graphical installer requires 'zenity'"
echo "=========================================="
echo ""
echo "zenity was not found on this system."
echo "Trying to install it automatically..."
echo "Command: {install_command}"
echo ""
{install_command}

EXIT_CODE=$?
echo ""
if [ $EXIT_CODE -eq 0 ]; then
    echo "Done. zenity is installed."
    echo "The installer will continue shortly..."
    sleep 2
else
    echo "Installation failed."
    echo "Press ENTER to exit."
    read
fi
exit $EXIT_CODE
"#
    )
}

/// Make sure zenity is available, installing it in a terminal window if needed.
///
/// Fails with [`InstallerError::DialogUnavailable`] when the family is unknown,
/// no terminal emulator is installed, or zenity is still missing afterwards.
pub async fn ensure_zenity(identity: &DistroIdentity) -> Result<(), InstallerError> {
    if command_exists(DIALOG_PROGRAM) {
        return Ok(());
    }

    let family = DistroFamily::detect(identity).ok_or_else(|| InstallerError::DialogUnavailable {
        reason: "zenity is not installed and this distribution is unknown, so it cannot be installed automatically".to_string(),
    })?;

    let terminal = find_terminal().ok_or_else(|| InstallerError::DialogUnavailable {
        reason: "zenity is not installed and no terminal emulator was found to install it"
            .to_string(),
    })?;

    let install_command = family.dialog_install_command();
    info!("zenity missing, installing it on {family} with: {install_command}");

    match terminal.run_script("install-zenity-", &zenity_install_script(install_command)).await {
        Ok(true) => {}
        Ok(false) => warn!("zenity installation script reported a failure"),
        Err(e) => warn!("Could not run zenity installation script: {e:#}"),
    }

    if command_exists(DIALOG_PROGRAM) {
        Ok(())
    } else {
        Err(InstallerError::DialogUnavailable {
            reason: "zenity is still not installed; the installation failed or was cancelled"
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_command_line() {
        let prompter = ZenityPrompter::new(&DialogConfig::default());
        let cmd = prompter.question_command("Open", "<b>Hi</b>");
        assert_eq!(cmd.display(), "zenity --question --title=Open --text=<b>Hi</b> --width=500");

        let cmd = prompter.error_command("bad");
        assert_eq!(cmd.display(), "zenity --error --text=bad --width=400");
    }

    #[test]
    fn test_install_script_runs_command() {
        let script = zenity_install_script("sudo dnf install -y zenity");
        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains("\nsudo dnf install -y zenity\n"));
        assert!(script.contains("exit $EXIT_CODE"));
    }

    #[tokio::test]
    async fn test_unknown_family_without_zenity_is_dialog_unavailable() {
        if command_exists(DIALOG_PROGRAM) {
            return;
        }
        let error = ensure_zenity(&DistroIdentity::new("unknownos", "", "")).await.unwrap_err();
        assert!(matches!(error, InstallerError::DialogUnavailable { .. }));
    }
}
