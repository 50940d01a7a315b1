//! Builder for the external programs the installer drives.
//!
//! Every subprocess (package managers, the privilege helper, dialogs, terminal
//! emulators) goes through [`SystemCommand`], so arguments are always passed as
//! an argv vector and every invocation is logged the same way.

use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::process::Command;

use crate::constants::PRIVILEGE_HELPER;

/// Builder for an external command.
///
/// Output is captured by default; [`inherit_stdio`](Self::inherit_stdio) hands the
/// terminal to the child, which interactive tools (pkexec's text agent, zypper)
/// need.
#[derive(Debug, Clone)]
pub struct SystemCommand {
    program: String,
    args: Vec<String>,
    capture_output: bool,
    context: Option<String>,
}

/// Captured output of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

impl SystemCommand {
    /// Command running `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            capture_output: true,
            context: None,
        }
    }

    /// `argv` elevated through the privilege helper.
    #[must_use]
    pub fn privileged(argv: &[String]) -> Self {
        Self::new(PRIVILEGE_HELPER).args(argv.iter().cloned())
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Let the child use the parent's stdin/stdout/stderr.
    #[must_use]
    pub const fn inherit_stdio(mut self) -> Self {
        self.capture_output = false;
        self
    }

    /// Label used in log lines and error messages.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The full command line, for display.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn log_start(&self) {
        match &self.context {
            Some(ctx) => tracing::debug!("({}) Executing command: {}", ctx, self.display()),
            None => tracing::debug!("Executing command: {}", self.display()),
        }
    }

    /// Run to completion. A non-zero exit status is an error carrying stderr.
    pub async fn execute(self) -> Result<CommandOutput> {
        self.log_start();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if self.capture_output {
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        let output =
            cmd.output().await.with_context(|| format!("Failed to execute {}", self.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::debug!("Command failed with exit code: {:?}", output.status.code());
            if !stderr.is_empty() {
                tracing::debug!("Error: {}", stderr.trim());
            }
            let label = self.context.as_deref().unwrap_or(&self.program);
            anyhow::bail!(
                "{} exited with status {}{}",
                label,
                output.status.code().map_or_else(|| "signal".to_string(), |c| c.to_string()),
                if stderr.trim().is_empty() {
                    String::new()
                } else {
                    format!(": {}", stderr.trim())
                }
            );
        }

        Ok(CommandOutput {
            stdout,
            stderr,
        })
    }

    /// Run to completion and return trimmed stdout.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Run to completion; `true` on exit status zero. Failures are logged, not returned.
    pub async fn succeeds(self) -> bool {
        match self.execute().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("{e:#}");
                false
            }
        }
    }

    /// Start the command without waiting for it. Its stdio is detached from ours.
    pub fn spawn_detached(self) -> Result<()> {
        self.log_start();
        std::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.display()))?;
        Ok(())
    }
}
