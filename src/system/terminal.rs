//! Terminal-side interaction: text prompts and running scripts in an emulator window.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{IsTerminal, Write};
use std::os::unix::fs::PermissionsExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::system::{Prompter, SystemCommand};
use crate::utils::command_exists;

/// A terminal emulator and the flag that makes it run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalEmulator {
    /// Executable name.
    pub program: &'static str,
    /// Flag preceding the command to run.
    pub exec_flag: &'static str,
}

/// Emulators tried in order when a script has to run in a visible terminal.
pub const TERMINAL_EMULATORS: &[TerminalEmulator] = &[
    TerminalEmulator { program: "gnome-terminal", exec_flag: "--" },
    TerminalEmulator { program: "konsole", exec_flag: "-e" },
    TerminalEmulator { program: "xfce4-terminal", exec_flag: "-e" },
    TerminalEmulator { program: "mate-terminal", exec_flag: "-e" },
    TerminalEmulator { program: "alacritty", exec_flag: "-e" },
    TerminalEmulator { program: "kitty", exec_flag: "-e" },
    TerminalEmulator { program: "xterm", exec_flag: "-e" },
    TerminalEmulator { program: "tilix", exec_flag: "-e" },
    TerminalEmulator { program: "ashyterm", exec_flag: "-e" },
    TerminalEmulator { program: "zashterminal", exec_flag: "-e" },
    TerminalEmulator { program: "terminator", exec_flag: "-x" },
];

/// First installed emulator from [`TERMINAL_EMULATORS`].
#[must_use]
pub fn find_terminal() -> Option<TerminalEmulator> {
    TERMINAL_EMULATORS.iter().copied().find(|terminal| command_exists(terminal.program))
}

impl TerminalEmulator {
    /// Write `script` to a temporary executable file and run it in this emulator.
    ///
    /// Waits for the emulator to exit and returns whether it exited successfully.
    /// The script file is removed afterwards on every path.
    pub async fn run_script(&self, name: &str, script: &str) -> Result<bool> {
        let mut file = tempfile::Builder::new()
            .prefix(name)
            .suffix(".sh")
            .tempfile()
            .context("Failed to create temporary script")?;
        file.write_all(script.as_bytes()).context("Failed to write temporary script")?;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o755))
            .context("Failed to make temporary script executable")?;

        // Closing the handle first avoids "text file busy" when the script is executed.
        let path = file.into_temp_path();
        info!("Running {} in {}", path.display(), self.program);

        let status = SystemCommand::new(self.program)
            .arg(self.exec_flag)
            .arg(path.display().to_string())
            .with_context(self.program)
            .inherit_stdio()
            .execute()
            .await;

        path.close().context("Failed to remove temporary script")?;

        match status {
            Ok(_) => Ok(true),
            Err(e) => {
                debug!("{e:#}");
                Ok(false)
            }
        }
    }
}

/// Single-quote `value` for a POSIX shell.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Remove Pango markup for plain-text output.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => plain.push(c),
            _ => {}
        }
    }
    plain.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
}

/// Prompts on stdin/stderr.
///
/// When stdin is not a terminal every question is answered "no".
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// New terminal prompter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Interpret a typed answer. Only an explicit yes counts.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl Prompter for TerminalPrompter {
    async fn confirm(&self, title: &str, body: &str) -> bool {
        if !std::io::stdin().is_terminal() {
            debug!("stdin is not a terminal, answering no to '{title}'");
            return false;
        }

        eprintln!();
        eprintln!("{}", title.bold());
        eprintln!("{}", strip_markup(body));
        eprint!("{} ", "[y/N]:".green());
        std::io::stderr().flush().ok();

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut response = String::new();
        match reader.read_line(&mut response).await {
            Ok(_) => is_yes(&response),
            Err(e) => {
                debug!("Failed to read answer: {e}");
                false
            }
        }
    }

    async fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), strip_markup(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_order() {
        assert_eq!(TERMINAL_EMULATORS[0].program, "gnome-terminal");
        assert_eq!(TERMINAL_EMULATORS[0].exec_flag, "--");
        let last = TERMINAL_EMULATORS[TERMINAL_EMULATORS.len() - 1];
        assert_eq!((last.program, last.exec_flag), ("terminator", "-x"));
        assert_eq!(TERMINAL_EMULATORS.len(), 11);
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("tac-writer"), "'tac-writer'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("<b>TAC Writer</b> is installed.\n<span size='small'>a &lt;b&gt; &amp; c</span>"),
            "TAC Writer is installed.\na <b> & c"
        );
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("sure"));
    }

    #[tokio::test]
    async fn test_run_script_reports_exit_status() {
        // `sh -e <path>` stands in for an emulator window
        let runner = TerminalEmulator { program: "sh", exec_flag: "-e" };
        let marker = tempfile::NamedTempFile::new().unwrap().into_temp_path();
        let script = format!("#!/bin/sh\nrm -f {}\nexit 0\n", shell_quote(&marker.display().to_string()));

        assert!(runner.run_script("tac-test-", &script).await.unwrap());
        assert!(!marker.exists());

        let failing = "#!/bin/sh\nexit 4\n";
        assert!(!runner.run_script("tac-test-", failing).await.unwrap());
    }
}
