//! Shared fixtures for the integration suite
//!
//! [`UpdaterProject`] is a throwaway server directory plus a local nightly
//! site. The fake server binary and archive tool are shell scripts, so the
//! suite runs on Unix only.

// Not every test uses every helper
#![allow(dead_code)]

use mta_server_updater::constants::{CONFIG_PATH_ENV, NO_PROGRESS_ENV};
use mta_server_updater::test_utils::fixtures::{write_fake_server, write_script};
use mta_server_updater::test_utils::{FixtureServer, listing_page};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

pub const SERVER_EXE: &str = "mta-server64";
pub const VERSION: &str = "1.6.0";

/// A server directory and the nightly site it updates from.
pub struct UpdaterProject {
    temp: TempDir,
    server: FixtureServer,
}

impl UpdaterProject {
    pub async fn new() -> Self {
        mta_server_updater::test_utils::init_test_logging(None);

        let temp = TempDir::new().expect("create temp dir");
        fs::create_dir_all(temp.path().join("server")).expect("create server dir");

        Self {
            temp,
            server: FixtureServer::start().await,
        }
    }

    /// The server installation directory, also the updater's working directory.
    pub fn root(&self) -> PathBuf {
        self.temp.path().join("server")
    }

    pub fn installed_exe(&self) -> PathBuf {
        self.root().join(SERVER_EXE)
    }

    /// Serve a listing whose newest build is `revision`, and the build itself.
    pub fn publish(&self, revision: u64) {
        let file = format!("mtasa_x64-{VERSION}-rc-{revision}-1.exe");
        self.publish_listing(&[&file]);
        self.server.route(
            &format!("/{file}"),
            200,
            "application/octet-stream",
            format!("NSIS installer for r{revision}").into_bytes(),
        );
    }

    /// Serve a listing page linking `files`, without serving the files.
    pub fn publish_listing(&self, files: &[&str]) {
        self.server.route("/", 200, "text/html", listing_page(files).into_bytes());
    }

    /// Serve a listing page that fails with `status`.
    pub fn publish_error(&self, status: u16) {
        self.server.route("/", status, "text/plain", b"unavailable".to_vec());
    }

    /// Install a server binary reporting `revision`.
    pub fn install(&self, revision: u64) {
        write_fake_server(&self.installed_exe(), VERSION, revision);
    }

    /// Revision the installed binary was written for.
    pub fn installed_revision(&self) -> Option<u64> {
        let script = fs::read_to_string(self.installed_exe()).ok()?;
        let tail = script.split("-release-").nth(1)?;
        tail.chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .ok()
    }

    /// An archive tool that behaves like `7z x -tnsis`, unpacking a server
    /// build for `revision` into `<-o dir>/server`.
    ///
    /// Fails with exit code 2 if it is not called with the NSIS type switch
    /// or the downloaded installer is missing.
    pub fn extractor(&self, revision: u64) -> PathBuf {
        let payload = self.temp.path().join(format!("payload-{revision}"));
        write_fake_server(&payload.join(SERVER_EXE), VERSION, revision);
        fs::create_dir_all(payload.join("mods").join("deathmatch")).expect("create payload");
        fs::write(payload.join("mods").join("deathmatch").join("mtaserver.conf"), "<config/>")
            .expect("write payload");

        let tool = self.temp.path().join("bin").join("7z");
        write_script(
            &tool,
            &format!(
                r#"[ "$1" = "x" ] && [ "$2" = "-tnsis" ] && [ -f "$7" ] || {{ echo "bad arguments: $*" >&2; exit 2; }}
out="${{5#-o}}"
mkdir -p "$out/server" && cp -R '{payload}/.' "$out/server/""#,
                payload = payload.display()
            ),
        );
        tool
    }

    /// An archive tool that exits with `code` after printing `message`.
    pub fn failing_extractor(&self, code: i32, message: &str) -> PathBuf {
        let tool = self.temp.path().join("bin").join("broken7z");
        write_script(&tool, &format!("echo '{message}' >&2\nexit {code}"));
        tool
    }

    /// Write `updmtaserver.toml` outside the server directory and return its path.
    pub fn write_config(&self, extract_tool: &Path) -> PathBuf {
        let path = self.temp.path().join("updmtaserver.toml");
        fs::write(&path, self.config_toml(extract_tool)).expect("write config");
        path
    }

    pub fn config_toml(&self, extract_tool: &Path) -> String {
        format!(
            "listing_url = \"{}\"\nhttp_timeout_secs = 5\nserver_executable = \"{}\"\nextract_tool = \"{}\"\n",
            self.server.url("/"),
            SERVER_EXE,
            extract_tool.display()
        )
    }

    /// Run `updmtaserver --no-pause` with `args` in the server directory.
    ///
    /// The binary runs on a blocking thread so the fixture server keeps
    /// answering on this runtime.
    pub async fn run(&self, args: &[&str]) -> Output {
        let root = self.root();
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();

        tokio::task::spawn_blocking(move || {
            assert_cmd::Command::cargo_bin("updmtaserver")
                .expect("updmtaserver binary")
                .current_dir(root)
                .arg("--no-pause")
                .args(args)
                .env("NO_COLOR", "1")
                .env(NO_PROGRESS_ENV, "1")
                .env_remove(CONFIG_PATH_ENV)
                .env_remove("RUST_LOG")
                .output()
                .expect("run updmtaserver")
        })
        .await
        .expect("join updmtaserver")
    }

    /// Run with `--config` pointing at a config using `extract_tool`.
    pub async fn run_with_tool(&self, extract_tool: &Path, extra: &[&str]) -> Output {
        let config = self.write_config(extract_tool);
        let config = config.display().to_string();
        let mut args = vec!["--config", config.as_str()];
        args.extend_from_slice(extra);
        self.run(&args).await
    }
}
