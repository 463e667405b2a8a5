//! Full update runs through the binary.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;

use crate::common::UpdaterProject;

#[tokio::test]
async fn test_outdated_server_is_replaced() {
    let project = UpdaterProject::new().await;
    project.publish(22451);
    project.install(22300);
    let tool = project.extractor(22451);

    let output = project.run_with_tool(&tool, &[]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Retrieving latest version: Done"))
        .stdout(predicate::str::contains("  - Latest version: v1.6.0-22451"))
        .stdout(predicate::str::contains("  - Current version: v1.6.0-22300"))
        .stdout(predicate::str::contains("Needs update"))
        .stdout(predicate::str::contains("Download: Done"))
        .stdout(predicate::str::contains("Extract: Done"))
        .stdout(predicate::str::contains("Move: Done"))
        .stdout(predicate::str::contains("Clean: Done"))
        .stdout(predicate::str::contains("Server updated to v1.6.0-22451"));

    assert_eq!(project.installed_revision(), Some(22451));
    assert!(
        project
            .root()
            .join("mods")
            .join("deathmatch")
            .join("mtaserver.conf")
            .is_file()
    );
    assert!(!project.root().join("tmp").exists(), "temp dir should be removed");
}

#[tokio::test]
async fn test_second_run_after_update_is_up_to_date() {
    let project = UpdaterProject::new().await;
    project.publish(22451);
    project.install(22300);
    let tool = project.extractor(22451);

    project.run_with_tool(&tool, &[]).await.assert().success();
    let output = project.run_with_tool(&tool, &[]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Up to date"))
        .stdout(predicate::str::contains("Download").not());
}

#[tokio::test]
async fn test_up_to_date_server_is_left_alone() {
    let project = UpdaterProject::new().await;
    project.publish(22451);
    project.install(22451);
    let tool = project.extractor(99999);

    let output = project.run_with_tool(&tool, &[]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Up to date"))
        .stdout(predicate::str::contains("Download").not());
    assert_eq!(project.installed_revision(), Some(22451));
    assert!(!project.root().join("tmp").exists());
}

#[tokio::test]
async fn test_newer_installed_build_is_reported_distinctly() {
    let project = UpdaterProject::new().await;
    project.publish(22451);
    project.install(22600);
    let tool = project.extractor(22451);

    let output = project.run_with_tool(&tool, &[]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("newer than the latest nightly"))
        .stdout(predicate::str::contains("Download").not());
    assert_eq!(project.installed_revision(), Some(22600));
}

#[tokio::test]
async fn test_check_mode_does_not_install() {
    let project = UpdaterProject::new().await;
    project.publish(22451);
    project.install(22300);
    let tool = project.extractor(22451);

    let output = project.run_with_tool(&tool, &["--check"]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Needs update"))
        .stdout(predicate::str::contains("Run without --check"))
        .stdout(predicate::str::contains("Download").not());
    assert_eq!(project.installed_revision(), Some(22300));
}

#[tokio::test]
async fn test_missing_server_ends_gracefully() {
    let project = UpdaterProject::new().await;
    project.publish(22451);
    let tool = project.extractor(22451);

    let output = project.run_with_tool(&tool, &[]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Querying installed server: Error"))
        .stdout(predicate::str::contains("mta-server64 not found"))
        .stdout(predicate::str::contains("Download").not());
    assert!(!project.installed_exe().exists());
    assert!(!project.root().join("tmp").exists());
}
