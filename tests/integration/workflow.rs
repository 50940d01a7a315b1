//! Whole-workflow tests across several runs, driven through the public API with
//! the recording fakes from `test_utils`.

use tac_installer::orchestrator::{InstallOrchestrator, Outcome, Stage};
use tac_installer::system::AssumeYes;
use tac_installer::test_utils::{
    FakeDownloader, FakeExecutor, FakeFeed, FakePrompter, InstallerFixture, init_test_logging,
    release,
};

#[tokio::test]
async fn test_install_then_rerun_is_up_to_date() {
    init_test_logging(None);
    let fixture = InstallerFixture::new();
    let probe = fixture.distro("debian", "");
    let feed = FakeFeed::serving(release("v1.4.0", &["tac-writer_1.4.0_amd64.deb"]));
    let executor = FakeExecutor::new();
    let downloader = FakeDownloader::new();

    let first = FakePrompter::answering([true, false]);
    let outcome = InstallOrchestrator::new(
        &fixture.config,
        &probe,
        &feed,
        &first,
        &executor,
        &downloader,
    )
    .run()
    .await
    .unwrap();
    assert_eq!(
        outcome,
        Outcome::Installed {
            version: "1.4.0".to_string(),
            launched: false,
        }
    );

    // the installer's own effects are faked, so create the install tree by hand
    fixture.mark_installed();

    let second = FakePrompter::answering([false]);
    let mut orchestrator =
        InstallOrchestrator::new(&fixture.config, &probe, &feed, &second, &executor, &downloader);
    let outcome = orchestrator.run().await.unwrap();

    assert_eq!(
        outcome,
        Outcome::UpToDate {
            version: "1.4.0".to_string(),
            launched: false,
        }
    );
    assert_eq!(orchestrator.history(), [
        Stage::Start,
        Stage::Detect,
        Stage::CheckUpdate,
        Stage::PromptOpen,
        Stage::End
    ]);
    assert_eq!(second.titles(), vec!["Open"]);
    assert_eq!(executor.commands().len(), 1);
    assert_eq!(downloader.downloads().len(), 1);
}

#[tokio::test]
async fn test_unattended_update_on_fedora() {
    init_test_logging(None);
    let fixture = InstallerFixture::new();
    fixture.mark_installed();
    fixture.write_marker("1.2.9");
    let probe = fixture.distro("fedora", "");
    let feed = FakeFeed::serving(release("v1.3.0", &[
        "tac-writer-1.3.0-1.aarch64.rpm",
        "tac-writer-1.3.0-1.x86_64.rpm",
    ]));
    let executor = FakeExecutor::new();
    let downloader = FakeDownloader::new();
    let inner = FakePrompter::answering(Vec::<bool>::new());
    let prompter = AssumeYes::new(inner.clone());

    let outcome = InstallOrchestrator::new(
        &fixture.config,
        &probe,
        &feed,
        &prompter,
        &executor,
        &downloader,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(
        outcome,
        Outcome::Installed {
            version: "1.3.0".to_string(),
            launched: true,
        }
    );
    assert_eq!(fixture.marker().as_deref(), Some("1.3.0"));
    assert!(inner.confirmations().is_empty());

    let downloads = downloader.downloads();
    assert_eq!(downloads.len(), 1);
    assert!(downloads[0].0.ends_with("tac-writer-1.3.0-1.x86_64.rpm"));

    let commands = executor.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0][..3], ["dnf", "install", "-y"]);
}

#[tokio::test]
async fn test_suse_installs_dependencies_first() {
    init_test_logging(None);
    let mut fixture = InstallerFixture::new();
    fixture.config.suse_dependencies = vec!["python313".to_string(), "zenity".to_string()];
    let probe = fixture.distro("opensuse-leap", "suse opensuse");
    let feed = FakeFeed::serving(release("v2.1.0", &["tac-writer-2.1.0.x86_64.rpm"]));
    let executor = FakeExecutor::new();
    let downloader = FakeDownloader::new();
    let prompter = FakePrompter::answering([true, false]);

    InstallOrchestrator::new(&fixture.config, &probe, &feed, &prompter, &executor, &downloader)
        .run()
        .await
        .unwrap();

    let commands = executor.commands();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0], [
        "zypper",
        "--non-interactive",
        "install",
        "-y",
        "python313",
        "zenity"
    ]);
    assert!(commands[1].contains(&"--allow-unsigned-rpm".to_string()));
    assert!(commands[1].last().unwrap().ends_with("tac-writer-2.1.0.x86_64.rpm"));
}
