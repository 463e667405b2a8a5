//! Updater configuration.
//!
//! The listing URL, executable name, version patterns, temp paths and the
//! extraction command all live in [`UpdaterConfig`]. It is loaded once at
//! startup and passed explicitly to the components that need it.
//!
//! # File Format
//!
//! Every key is optional; missing keys take the built-in default.
//!
//! ```toml
//! listing_url = "https://nightly.mtasa.com/"
//! http_timeout_secs = 30
//! server_executable = "MTA Server64.exe"
//! install_dir = "."
//! temp_dir = "tmp"
//! extract_tool = "C:\\Program Files\\7-Zip\\7z.exe"
//! ```
//!
//! # Lookup Order
//!
//! 1. The path given with `--config`
//! 2. The `MTASA_UPDATER_CONFIG` environment variable
//! 3. `updmtaserver.toml` in the working directory
//! 4. `<config dir>/updmtaserver/config.toml` (e.g. `~/.config` on Linux)
//! 5. Built-in defaults

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::constants::{
    CONFIG_PATH_ENV, DEFAULT_CURRENT_PATTERN, DEFAULT_DOWNLOAD_FILE, DEFAULT_EXTRACT_ARGS,
    DEFAULT_EXTRACT_TOOL, DEFAULT_EXTRACTED_SUBDIR, DEFAULT_HTTP_TIMEOUT, DEFAULT_LATEST_PATTERN,
    DEFAULT_LISTING_URL, DEFAULT_SERVER_EXECUTABLE, DEFAULT_TEMP_DIR, DEFAULT_VERSION_FLAG,
    LOCAL_CONFIG_FILE,
};
use crate::core::UpdaterError;

/// Process-wide settings for one update run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Nightly listing page. Relative download links are resolved against it.
    pub listing_url: String,

    /// Timeout in seconds for the listing request and for each download read.
    pub http_timeout_secs: u64,

    /// Server executable, relative to `install_dir` unless absolute.
    pub server_executable: PathBuf,

    /// Flag that makes the server print its version.
    pub version_flag: String,

    /// Directory holding the installed server. New files are merged into it.
    pub install_dir: PathBuf,

    /// Scratch directory for the download and the extracted tree.
    ///
    /// Removed at the end of every update attempt that reaches the Clean step.
    pub temp_dir: PathBuf,

    /// File name of the downloaded installer inside `temp_dir`.
    pub download_file: String,

    /// Archive tool program name or path.
    pub extract_tool: String,

    /// Arguments for the archive tool; `{temp}` and `{download}` are expanded.
    pub extract_args: Vec<String>,

    /// Directory inside `temp_dir` whose contents are installed.
    pub extracted_subdir: PathBuf,

    /// Pattern matched against listing anchor text.
    pub latest_pattern: String,

    /// Pattern matched against the server's version output.
    pub current_pattern: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT.as_secs(),
            server_executable: PathBuf::from(DEFAULT_SERVER_EXECUTABLE),
            version_flag: DEFAULT_VERSION_FLAG.to_string(),
            install_dir: PathBuf::from("."),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            download_file: DEFAULT_DOWNLOAD_FILE.to_string(),
            extract_tool: DEFAULT_EXTRACT_TOOL.to_string(),
            extract_args: DEFAULT_EXTRACT_ARGS.iter().map(|arg| (*arg).to_string()).collect(),
            extracted_subdir: PathBuf::from(DEFAULT_EXTRACTED_SUBDIR),
            latest_pattern: DEFAULT_LATEST_PATTERN.to_string(),
            current_pattern: DEFAULT_CURRENT_PATTERN.to_string(),
        }
    }
}

impl UpdaterConfig {
    /// Load and validate configuration following the lookup order above.
    ///
    /// An explicitly named file must exist. Implicit locations are skipped when
    /// absent, falling back to the defaults.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match Self::locate(explicit) {
            Some(path) => Self::load_from(&path).await?,
            None => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file without validating it.
    pub async fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            UpdaterError::ConfigError {
                message: format!("{}: {}", path.display(), e.message()),
            }
            .into()
        })
    }

    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("updmtaserver").join("config.toml"))
            .filter(|path| path.is_file())
    }

    /// Check that the configuration can drive a run.
    ///
    /// Both patterns must compile and expose a version and a revision group,
    /// the listing URL must parse, and the timeout must be non-zero.
    pub fn validate(&self) -> Result<(), UpdaterError> {
        self.listing_url()?;
        compile_version_pattern("latest_pattern", &self.latest_pattern)?;
        compile_version_pattern("current_pattern", &self.current_pattern)?;

        if self.http_timeout_secs == 0 {
            return Err(UpdaterError::ConfigError {
                message: "http_timeout_secs must be greater than zero".to_string(),
            });
        }

        if self.download_file.is_empty() || self.extract_tool.is_empty() {
            return Err(UpdaterError::ConfigError {
                message: "download_file and extract_tool must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// The listing page as a parsed URL.
    pub fn listing_url(&self) -> Result<Url, UpdaterError> {
        Url::parse(&self.listing_url).map_err(|e| UpdaterError::ConfigError {
            message: format!("listing_url `{}` is not a valid URL: {e}", self.listing_url),
        })
    }

    /// Network timeout as a [`Duration`].
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Where the server executable is expected to be.
    #[must_use]
    pub fn executable_path(&self) -> PathBuf {
        self.install_dir.join(&self.server_executable)
    }

    /// Where the installer is downloaded to.
    #[must_use]
    pub fn download_path(&self) -> PathBuf {
        self.temp_dir.join(&self.download_file)
    }

    /// Directory whose contents are moved into the install directory.
    #[must_use]
    pub fn extracted_dir(&self) -> PathBuf {
        self.temp_dir.join(&self.extracted_subdir)
    }

    /// Archive tool arguments with `{temp}` and `{download}` expanded.
    #[must_use]
    pub fn expanded_extract_args(&self) -> Vec<String> {
        let temp = self.temp_dir.display().to_string();
        let download = self.download_path().display().to_string();

        self.extract_args
            .iter()
            .map(|arg| arg.replace("{temp}", &temp).replace("{download}", &download))
            .collect()
    }
}

/// Compile a version pattern, requiring a version and a revision group.
pub fn compile_version_pattern(name: &str, pattern: &str) -> Result<Regex, UpdaterError> {
    let regex = Regex::new(pattern).map_err(|e| UpdaterError::ConfigError {
        message: format!("{name} is not a valid regular expression: {e}"),
    })?;

    // captures_len counts the implicit whole-match group
    if regex.captures_len() < 3 {
        return Err(UpdaterError::ConfigError {
            message: format!("{name} must capture a version and a revision group"),
        });
    }

    Ok(regex)
}
