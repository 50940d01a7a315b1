//! End-to-end tests of the offline commands.
//!
//! Every invocation gets an explicit `--config` and `--os-release` so nothing on
//! the host machine leaks into the result.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

struct TestHost {
    temp: TempDir,
}

impl TestHost {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "").unwrap();
        Self {
            temp,
        }
    }

    fn with_config(self, content: &str) -> Self {
        fs::write(self.temp.path().join("config.toml"), content).unwrap();
        self
    }

    fn os_release(&self, content: &str) {
        fs::write(self.temp.path().join("os-release"), content).unwrap();
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("tac-installer").unwrap();
        cmd.env_remove("TAC_INSTALLER_CONFIG")
            .env_remove("RUST_LOG")
            .env("TAC_INSTALLER_NO_PROGRESS", "1")
            .arg("--config")
            .arg(self.temp.path().join("config.toml"))
            .arg("--os-release")
            .arg(self.temp.path().join("os-release"))
            .arg("--no-gui")
            .args(args);
        cmd
    }
}

#[test]
fn test_detect_ubuntu_uses_deb_packages() {
    let host = TestHost::new();
    host.os_release("ID=ubuntu\nID_LIKE=debian\nPRETTY_NAME=\"Ubuntu 24.04 LTS\"\n");

    host.command(&["detect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ubuntu 24.04 LTS"))
        .stdout(predicate::str::contains("Debian"))
        .stdout(predicate::str::contains(".deb"))
        .stdout(predicate::str::contains("apt install -y"));
}

#[test]
fn test_detect_suse_shows_dependency_step() {
    let host = TestHost::new();
    host.os_release("ID=\"opensuse-tumbleweed\"\nID_LIKE=\"opensuse suse\"\n");

    host.command(&["detect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUSE"))
        .stdout(predicate::str::contains(".rpm"))
        .stdout(predicate::str::contains("--allow-unsigned-rpm"))
        .stdout(predicate::str::contains("python313-pygtkspellcheck"));
}

#[test]
fn test_detect_arch_with_aur_delivery() {
    let host = TestHost::new().with_config("[arch]\ndelivery = \"aur\"\n");
    host.os_release("ID=cachyos\nID_LIKE=arch\n");

    host.command(&["detect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Arch"))
        .stdout(predicate::str::contains("AUR build of tac-writer"));
}

#[test]
fn test_detect_json_output() {
    let host = TestHost::new();
    host.os_release("ID=fedora\nPRETTY_NAME=\"Fedora Linux 41\"\n");

    let output = host.command(&["detect", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["id"], "fedora");
    assert_eq!(value["family"], "Fedora");
    assert_eq!(value["archive_suffix"], ".rpm");
    assert_eq!(value["install_command"], "dnf install -y");
    assert!(value["pre_install_step"].is_null());
}

#[test]
fn test_detect_unsupported_distro_fails() {
    let host = TestHost::new();
    host.os_release("ID=gentoo\nPRETTY_NAME=\"Gentoo Linux\"\n");

    host.command(&["detect"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unsupported distribution"))
        .stderr(predicate::str::contains("Gentoo Linux"));
}

#[test]
fn test_detect_missing_os_release_is_unsupported() {
    let host = TestHost::new();

    host.command(&["detect"]).assert().failure().code(1);
}

#[test]
fn test_invalid_config_is_rejected() {
    let host = TestHost::new().with_config("app_name = \"\"\n");
    host.os_release("ID=debian\n");

    host.command(&["detect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("app_name"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let host = TestHost::new();
    host.os_release("ID=debian\n");

    host.command(&["-v", "-q", "detect"]).assert().failure();
}
