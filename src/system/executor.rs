use tracing::{debug, info, warn};

use crate::config::{InstallConfig, InstallerConfig};
use crate::state::is_installed;
use crate::system::terminal::{TerminalEmulator, find_terminal, shell_quote};
use crate::system::{Executor, SystemCommand};

/// Base URL of the Arch User Repository git remotes.
pub const AUR_BASE_URL: &str = "https://aur.archlinux.org";

/// Runs package managers, the privilege helper and the installed application.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    install: InstallConfig,
}

impl SystemExecutor {
    /// Executor for the application described in `config`.
    #[must_use]
    pub fn new(config: &InstallerConfig) -> Self {
        Self {
            install: config.install.clone(),
        }
    }
}

/// Parse `pacman -Q` output (`<name> <version>`) into the version.
#[must_use]
pub fn parse_pacman_query(output: &str) -> Option<String> {
    output.split_whitespace().nth(1).map(ToString::to_string)
}

/// Bash script building `package` from the AUR with yay, paru, or makepkg.
///
/// The helper caches are cleared first so a re-tagged upstream is rebuilt.
/// Exits 0 only when pacman reports the package as installed afterwards.
#[must_use]
pub fn aur_build_script(package: &str) -> String {
    let pkg = shell_quote(package);
    format!(
        r#"#!/bin/bash
echo "=== AUR installation: {package} ==="
echo ""

check_install() {{
    if pacman -Qi {pkg} &> /dev/null; then
        echo ""
        echo ">>> Package installed."
        echo "Press ENTER to close."
        read
        exit 0
    else
        echo ""
        echo ">>> Installation failed."
        echo "Press ENTER to close."
        read
        exit 1
    fi
}}

if command -v yay &> /dev/null; then
    echo ">> Using yay..."
    rm -rf "$HOME/.cache/yay/"{pkg}
    yay -S --noconfirm {pkg}
    check_install
elif command -v paru &> /dev/null; then
    echo ">> Using paru..."
    rm -rf "$HOME/.cache/paru/clone/"{pkg}
    rm -rf "$HOME/.cache/paru/"{pkg}
    paru -S --rebuild --noconfirm {pkg}
    check_install
else
    echo ">> No AUR helper (yay/paru) found, building manually..."
    echo ">> Installing base-devel and git..."
    sudo pacman -S --needed --noconfirm base-devel git

    BUILD_DIR="$(mktemp -d)"
    cd "$BUILD_DIR" || exit 1

    echo ">> Cloning from the AUR..."
    git clone {url}
    cd {pkg} || exit 1

    echo ">> Building..."
    makepkg -si --noconfirm
    check_install
fi
"#,
        url = shell_quote(&format!("{AUR_BASE_URL}/{package}.git")),
    )
}

/// Run `script` in `terminal`; `true` only when it exited successfully.
async fn run_in_terminal(terminal: &TerminalEmulator, name: &str, script: &str) -> bool {
    match terminal.run_script(name, script).await {
        Ok(true) => true,
        Ok(false) => {
            warn!("{} script failed or was closed early", name.trim_end_matches('-'));
            false
        }
        Err(e) => {
            warn!("Could not run {} script: {e:#}", name.trim_end_matches('-'));
            false
        }
    }
}

impl Executor for SystemExecutor {
    async fn run_privileged(&self, argv: &[String]) -> bool {
        SystemCommand::privileged(argv).with_context("privileged").inherit_stdio().succeeds().await
    }

    async fn installed_package_version(&self, package: &str) -> Option<String> {
        match SystemCommand::new("pacman").args(["-Q", package]).execute_stdout().await {
            Ok(output) => parse_pacman_query(&output),
            Err(e) => {
                debug!("pacman does not know {package}: {e:#}");
                None
            }
        }
    }

    async fn build_from_aur(&self, package: &str) -> bool {
        let Some(terminal) = find_terminal() else {
            warn!("No terminal emulator found to run the AUR build");
            return false;
        };

        run_in_terminal(&terminal, "install-aur-", &aur_build_script(package)).await
            && is_installed(&self.install)
    }

    async fn launch(&self) -> bool {
        if let Some(executable) = &self.install.executable {
            match SystemCommand::new(executable.as_str()).spawn_detached() {
                Ok(()) => {
                    info!("Launched {executable}");
                    return true;
                }
                Err(e) => debug!("{e:#}"),
            }
        }

        let Some((program, args)) = self.install.fallback_launch.split_first() else {
            warn!("No way to launch the application is configured");
            return false;
        };

        match SystemCommand::new(program.as_str()).args(args.iter().cloned()).spawn_detached() {
            Ok(()) => {
                info!("Launched {}", program);
                true
            }
            Err(e) => {
                warn!("Could not launch the application: {e:#}");
                false
            }
        }
    }
}
