//! Argument handling and configuration discovery.

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use mta_server_updater::constants::{CONFIG_PATH_ENV, LOCAL_CONFIG_FILE, NO_PROGRESS_ENV};
use mta_server_updater::test_utils::FixtureServer;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Output;
use tempfile::TempDir;

/// Run the binary in `dir` on a blocking thread, with extra environment.
async fn run_in(dir: PathBuf, args: &[&str], env: &[(&str, String)]) -> Output {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    let env: Vec<(String, String)> = env.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect();

    tokio::task::spawn_blocking(move || {
        let mut cmd = Command::cargo_bin("updmtaserver").unwrap();
        cmd.current_dir(dir)
            .arg("--no-pause")
            .args(args)
            .env("NO_COLOR", "1")
            .env(NO_PROGRESS_ENV, "1")
            .env_remove(CONFIG_PATH_ENV)
            .env_remove("RUST_LOG");
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.output().unwrap()
    })
    .await
    .unwrap()
}

/// A listing site that always answers 404, so a run ends right after the
/// first lookup and shows which URL it used.
async fn dead_site() -> FixtureServer {
    FixtureServer::start().await
}

#[test]
fn test_help_lists_flags() {
    Command::cargo_bin("updmtaserver")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--check"))
        .stdout(predicate::str::contains("--no-pause"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("updmtaserver")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    Command::cargo_bin("updmtaserver")
        .unwrap()
        .args(["--verbose", "--quiet", "--no-pause"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[tokio::test]
async fn test_local_config_file_is_discovered() {
    let server = dead_site().await;
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join(LOCAL_CONFIG_FILE),
        format!("listing_url = \"{}\"\n", server.url("/nightly/")),
    )
    .unwrap();

    let output = run_in(temp.path().to_path_buf(), &[], &[]).await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Retrieving latest version: Error"))
        .stdout(predicate::str::contains(server.url("/nightly/").as_str()));
}

#[tokio::test]
async fn test_config_env_var_is_honoured() {
    let server = dead_site().await;
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("elsewhere.toml");
    std::fs::write(&config, format!("listing_url = \"{}\"\n", server.url("/from-env/"))).unwrap();

    let output = run_in(
        temp.path().to_path_buf(),
        &[],
        &[(CONFIG_PATH_ENV, config.display().to_string())],
    )
    .await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains(server.url("/from-env/").as_str()));
}

#[tokio::test]
async fn test_config_flag_beats_local_file() {
    let server = dead_site().await;
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join(LOCAL_CONFIG_FILE),
        format!("listing_url = \"{}\"\n", server.url("/local/")),
    )
    .unwrap();
    let explicit = temp.path().join("explicit.toml");
    std::fs::write(&explicit, format!("listing_url = \"{}\"\n", server.url("/explicit/"))).unwrap();

    let output = run_in(
        temp.path().to_path_buf(),
        &["--config", explicit.to_str().unwrap()],
        &[],
    )
    .await;

    output
        .assert()
        .success()
        .stdout(predicate::str::contains(server.url("/explicit/").as_str()))
        .stdout(predicate::str::contains(server.url("/local/").as_str()).not());
}
