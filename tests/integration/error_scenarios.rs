//! Failure handling: which failures end the run quietly and which exit 1.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;

use crate::common::UpdaterProject;

#[tokio::test]
async fn test_unreachable_listing_is_reported_not_fatal() {
    let project = UpdaterProject::new().await;
    project.publish_error(503);
    project.install(22300);
    let tool = project.extractor(22451);

    let output = project.run_with_tool(&tool, &[]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Retrieving latest version: Error"))
        .stdout(predicate::str::contains("503"))
        .stdout(predicate::str::contains("Querying installed server").not());
}

#[tokio::test]
async fn test_listing_without_builds_is_reported() {
    let project = UpdaterProject::new().await;
    project.install(22300);
    // Only the 32-bit build is listed
    project.publish_listing(&[]);
    let tool = project.extractor(22451);

    let output = project.run_with_tool(&tool, &[]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Retrieving latest version: Error"))
        .stdout(predicate::str::contains("No match for pattern"));
    assert_eq!(project.installed_revision(), Some(22300));
}

#[tokio::test]
async fn test_missing_archive_tool_stops_before_install() {
    let project = UpdaterProject::new().await;
    project.publish(22451);
    project.install(22300);

    let output = project
        .run_with_tool(std::path::Path::new("no-such-archiver-7f3a"), &[])
        .await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Download: Done"))
        .stdout(predicate::str::contains("Extract: Error"))
        .stdout(predicate::str::contains(
            "Please install no-such-archiver-7f3a and add it to your PATH",
        ))
        .stdout(predicate::str::contains("Move").not());
    assert_eq!(project.installed_revision(), Some(22300));
    assert!(project.root().join("tmp").join("mtaserver.exe").is_file());
}

#[tokio::test]
async fn test_failing_archive_tool_shows_exit_status() {
    let project = UpdaterProject::new().await;
    project.publish(22451);
    project.install(22300);
    let tool = project.failing_extractor(2, "Can not open the file as archive");

    let output = project.run_with_tool(&tool, &[]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract: Error"))
        .stdout(predicate::str::contains("exited with exit code 2"))
        .stdout(predicate::str::contains("Move").not());
    assert_eq!(project.installed_revision(), Some(22300));
}

#[tokio::test]
async fn test_move_failure_exits_with_error() {
    let project = UpdaterProject::new().await;
    project.publish(22451);
    project.install(22300);
    // Exits successfully without unpacking anything
    let tool = project.failing_extractor(0, "nothing to do");

    let output = project.run_with_tool(&tool, &[]).await;

    output
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Move: Error"))
        .stdout(predicate::str::contains("Clean").not())
        .stderr(predicate::str::contains("Update failed"))
        .stderr(predicate::str::contains("File system error"));
    assert_eq!(project.installed_revision(), Some(22300));
}

#[tokio::test]
async fn test_invalid_config_exits_with_error() {
    let project = UpdaterProject::new().await;
    let config = project.root().join("broken.toml");
    fs::write(&config, "latest_pattern = 'mtasa_x64-.*\\.exe'\n").unwrap();

    let output = project.run(&["--config", config.to_str().unwrap()]).await;

    output
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "latest_pattern must capture a version and a revision group",
        ));
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let project = UpdaterProject::new().await;

    let output = project.run(&["--config", "does-not-exist.toml"]).await;

    output
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does-not-exist.toml"));
}
