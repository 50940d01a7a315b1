//! Distribution-specific packaging policy.
//!
//! [`DistroFamily::detect`] walks [`FAMILY_PRIORITY`] in order and returns the first
//! family whose markers occur (as substrings) in either the `ID` or `ID_LIKE` of the
//! host. The order matters because the fields overlap:
//!
//! 1. Arch (`arch`, `manjaro`, `cachyos`) - first, its delivery differs structurally
//! 2. Debian (`debian`, `ubuntu`)
//! 3. SUSE (`suse`) - part of the RPM family, checked before Fedora so that a
//!    SUSE-like system always gets the SUSE dependency step
//! 4. Fedora (`fedora`, `bazzite`)
//!
//! [`PackagePolicy::resolve`] then maps the family to a [`PackagePlan`]. Nothing
//! matches → [`InstallerError::UnsupportedDistro`]; there is no default family.

use std::fmt;
use std::path::Path;

use crate::config::InstallerConfig;
use crate::core::InstallerError;
use crate::distro::DistroIdentity;

/// Suffix of pre-built Arch packages.
pub const ARCH_PACKAGE_SUFFIX: &str = ".pkg.tar.zst";

/// A family of distributions sharing a package format and manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistroFamily {
    /// Arch Linux and derivatives (pacman).
    Arch,
    /// Debian, Ubuntu and derivatives (apt).
    Debian,
    /// openSUSE and SLE (zypper).
    Suse,
    /// Fedora and derivatives (dnf).
    Fedora,
}

/// Family markers in match priority order.
pub const FAMILY_PRIORITY: &[(DistroFamily, &[&str])] = &[
    (DistroFamily::Arch, &["arch", "manjaro", "cachyos"]),
    (DistroFamily::Debian, &["debian", "ubuntu"]),
    (DistroFamily::Suse, &["suse"]),
    (DistroFamily::Fedora, &["fedora", "bazzite"]),
];

impl DistroFamily {
    /// First family in [`FAMILY_PRIORITY`] matching `identity`.
    #[must_use]
    pub fn detect(identity: &DistroIdentity) -> Option<Self> {
        FAMILY_PRIORITY
            .iter()
            .find(|(_, markers)| markers.iter().any(|marker| identity.mentions(marker)))
            .map(|(family, _)| *family)
    }

    /// Shell command that installs the zenity dialog tool on this family.
    #[must_use]
    pub const fn dialog_install_command(self) -> &'static str {
        match self {
            Self::Arch => "sudo pacman -S --noconfirm zenity",
            Self::Debian => "sudo apt-get update && sudo apt-get install -y zenity",
            Self::Fedora => "sudo dnf install -y zenity",
            Self::Suse => "sudo zypper --non-interactive install -y zenity",
        }
    }
}

impl fmt::Display for DistroFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Arch => "Arch",
            Self::Debian => "Debian",
            Self::Suse => "SUSE",
            Self::Fedora => "Fedora",
        };
        f.write_str(name)
    }
}

/// Everything needed to apply a release on one distribution family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePlan {
    /// The family this plan was derived for.
    pub family: DistroFamily,
    /// Release asset suffix to download.
    pub archive_suffix: String,
    /// Privileged install command; the downloaded file is appended as last argument.
    pub install_command: Vec<String>,
    /// Dependency command run before the main install, if any.
    pub pre_install_step: Option<Vec<String>>,
}

impl PackagePlan {
    /// Full install argv for a downloaded package.
    #[must_use]
    pub fn install_argv(&self, package: &Path) -> Vec<String> {
        let mut argv = self.install_command.clone();
        argv.push(package.display().to_string());
        argv
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

/// Maps a [`DistroIdentity`] to a [`PackagePlan`].
#[derive(Debug, Clone, Default)]
pub struct PackagePolicy {
    suse_dependencies: Vec<String>,
}

impl PackagePolicy {
    /// Policy installing `suse_dependencies` ahead of the main package on SUSE.
    #[must_use]
    pub const fn new(suse_dependencies: Vec<String>) -> Self {
        Self {
            suse_dependencies,
        }
    }

    /// Policy configured from the installer configuration.
    #[must_use]
    pub fn from_config(config: &InstallerConfig) -> Self {
        Self::new(config.suse_dependencies.clone())
    }

    /// Resolve the plan for `identity`.
    pub fn resolve(&self, identity: &DistroIdentity) -> Result<PackagePlan, InstallerError> {
        let family =
            DistroFamily::detect(identity).ok_or_else(|| InstallerError::UnsupportedDistro {
                id: identity.id.clone(),
                pretty_name: identity.pretty_name.clone(),
            })?;

        let plan = match family {
            DistroFamily::Arch => PackagePlan {
                family,
                archive_suffix: ARCH_PACKAGE_SUFFIX.to_string(),
                install_command: argv(&["pacman", "-U", "--noconfirm"]),
                pre_install_step: None,
            },
            DistroFamily::Debian => PackagePlan {
                family,
                archive_suffix: ".deb".to_string(),
                install_command: argv(&["apt", "install", "-y"]),
                pre_install_step: None,
            },
            DistroFamily::Fedora => PackagePlan {
                family,
                archive_suffix: ".rpm".to_string(),
                install_command: argv(&["dnf", "install", "-y"]),
                pre_install_step: None,
            },
            DistroFamily::Suse => {
                let mut dependencies = argv(&["zypper", "--non-interactive", "install", "-y"]);
                dependencies.extend(self.suse_dependencies.iter().cloned());
                PackagePlan {
                    family,
                    archive_suffix: ".rpm".to_string(),
                    install_command: argv(&[
                        "zypper",
                        "--non-interactive",
                        "install",
                        "-y",
                        "--allow-unsigned-rpm",
                    ]),
                    pre_install_step: (!self.suse_dependencies.is_empty()).then_some(dependencies),
                }
            }
        };

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn policy() -> PackagePolicy {
        PackagePolicy::from_config(&InstallerConfig::default())
    }

    fn id(id: &str) -> DistroIdentity {
        DistroIdentity::new(id, "", "")
    }

    fn id_like(id_like: &str) -> DistroIdentity {
        DistroIdentity::new("custom", id_like, "")
    }

    #[test]
    fn test_ubuntu_gets_deb_plan() {
        let plan = policy().resolve(&id("ubuntu")).unwrap();
        assert_eq!(plan.family, DistroFamily::Debian);
        assert_eq!(plan.archive_suffix, ".deb");
        assert_eq!(plan.install_command, vec!["apt", "install", "-y"]);
        assert!(plan.pre_install_step.is_none());
    }

    #[test]
    fn test_arch_family() {
        for identity in [id("arch"), id("cachyos"), id("manjaro"), id_like("arch")] {
            let plan = policy().resolve(&identity).unwrap();
            assert_eq!(plan.family, DistroFamily::Arch, "{identity:?}");
            assert_eq!(plan.archive_suffix, ARCH_PACKAGE_SUFFIX);
        }
    }

    #[test]
    fn test_fedora_family() {
        for identity in [id("fedora"), id("bazzite"), id_like("fedora")] {
            let plan = policy().resolve(&identity).unwrap();
            assert_eq!(plan.family, DistroFamily::Fedora, "{identity:?}");
            assert_eq!(plan.archive_suffix, ".rpm");
            assert_eq!(plan.install_command, vec!["dnf", "install", "-y"]);
            assert!(plan.pre_install_step.is_none());
        }
    }

    #[test]
    fn test_suse_gets_dependency_step() {
        for identity in [id("opensuse-leap"), id_like("suse")] {
            let plan = policy().resolve(&identity).unwrap();
            assert_eq!(plan.family, DistroFamily::Suse);
            assert_eq!(plan.archive_suffix, ".rpm");
            assert!(plan.install_command.contains(&"--allow-unsigned-rpm".to_string()));

            let step = plan.pre_install_step.expect("SUSE plan has a dependency step");
            assert_eq!(&step[..4], &["zypper", "--non-interactive", "install", "-y"]);
            assert!(step.contains(&"liberation-fonts".to_string()));
        }
    }

    #[test]
    fn test_suse_without_dependencies_has_no_step() {
        let plan = PackagePolicy::new(Vec::new()).resolve(&id("opensuse-tumbleweed")).unwrap();
        assert!(plan.pre_install_step.is_none());
    }

    #[test]
    fn test_unknown_distro_is_unsupported() {
        let error = policy().resolve(&id("unknownos")).unwrap_err();
        assert!(matches!(error, InstallerError::UnsupportedDistro { ref id, .. } if id == "unknownos"));

        assert!(policy().resolve(&DistroIdentity::default()).is_err());
    }

    #[test]
    fn test_priority_order_arch_before_debian() {
        // an Arch-derived id that also claims Debian ancestry still resolves as Arch
        let identity = DistroIdentity::new("archcraft", "debian", "");
        assert_eq!(DistroFamily::detect(&identity), Some(DistroFamily::Arch));
    }

    #[test]
    fn test_priority_order_suse_before_fedora() {
        let identity = DistroIdentity::new("custom", "fedora suse", "");
        assert_eq!(DistroFamily::detect(&identity), Some(DistroFamily::Suse));
    }

    #[test]
    fn test_install_argv_appends_package() {
        let plan = policy().resolve(&id("debian")).unwrap();
        let argv = plan.install_argv(&PathBuf::from("/tmp/x/app.deb"));
        assert_eq!(argv, vec!["apt", "install", "-y", "/tmp/x/app.deb"]);
    }

    #[test]
    fn test_dialog_install_commands() {
        assert!(DistroFamily::Debian.dialog_install_command().contains("apt-get install -y zenity"));
        assert!(DistroFamily::Suse.dialog_install_command().starts_with("sudo zypper"));
    }
}
