//! Reading server versions out of text.
//!
//! Two sources, one pattern each:
//!
//! - [`ListingScraper`] parses the nightly listing HTML and finds the first
//!   anchor whose text is a server build file name.
//! - [`VersionProbe`] runs the installed server with its version flag and
//!   parses what it prints.
//!
//! Both patterns put the dotted version in capture group 1 and the revision in
//! group 2.

use regex::{Captures, Regex};
use reqwest::Url;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::ServerVersion;
use crate::config::{UpdaterConfig, compile_version_pattern};
use crate::core::UpdaterError;
use crate::process::ToolCommand;

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("anchor selector is valid CSS"));

/// The newest build found on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestBuild {
    /// Version and revision parsed from the anchor text
    pub version: ServerVersion,
    /// Anchor `href` resolved against the listing URL
    pub url: Url,
    /// The anchor text, i.e. the artifact file name
    pub file_name: String,
}

/// Finds the latest server build on a nightly listing page.
#[derive(Debug, Clone)]
pub struct ListingScraper {
    pattern: Regex,
    base_url: Url,
}

impl ListingScraper {
    /// Create a scraper from a compiled pattern and the page's own URL.
    pub const fn new(pattern: Regex, base_url: Url) -> Self {
        Self { pattern, base_url }
    }

    /// Build a scraper from `latest_pattern` and `listing_url`.
    pub fn from_config(config: &UpdaterConfig) -> Result<Self, UpdaterError> {
        Ok(Self::new(
            compile_version_pattern("latest_pattern", &config.latest_pattern)?,
            config.listing_url()?,
        ))
    }

    /// Find the first anchor whose text matches the build pattern.
    ///
    /// The anchor's `href` is resolved against the listing URL, so both
    /// relative and absolute links work.
    ///
    /// # Errors
    ///
    /// [`UpdaterError::PatternNotFound`] if no anchor matches, or if the first
    /// matching anchor has no usable `href`.
    pub fn scrape(&self, html: &str) -> Result<LatestBuild, UpdaterError> {
        let document = Html::parse_document(html);

        for anchor in document.select(&ANCHORS) {
            let text = anchor.text().collect::<String>();
            let text = text.trim();

            let Some(version) = self.pattern.captures(text).and_then(|caps| version_from(&caps))
            else {
                continue;
            };

            debug!("Matched listing anchor: {}", text);

            let url = anchor
                .value()
                .attr("href")
                .and_then(|href| self.base_url.join(href.trim()).ok())
                .ok_or_else(|| {
                    warn!("Anchor '{}' has no usable href", text);
                    self.not_found()
                })?;

            return Ok(LatestBuild {
                version,
                url,
                file_name: text.to_string(),
            });
        }

        Err(self.not_found())
    }

    fn not_found(&self) -> UpdaterError {
        UpdaterError::PatternNotFound {
            origin: self.base_url.to_string(),
            pattern: self.pattern.as_str().to_string(),
        }
    }
}

/// Asks the installed server which build it is.
#[derive(Debug, Clone)]
pub struct VersionProbe {
    executable: PathBuf,
    flag: String,
    pattern: Regex,
}

impl VersionProbe {
    /// Create a probe for `executable`, run with `flag`, parsed with `pattern`.
    pub fn new(executable: impl Into<PathBuf>, flag: impl Into<String>, pattern: Regex) -> Self {
        Self {
            executable: executable.into(),
            flag: flag.into(),
            pattern,
        }
    }

    /// Build a probe from `server_executable`, `version_flag` and `current_pattern`.
    pub fn from_config(config: &UpdaterConfig) -> Result<Self, UpdaterError> {
        Ok(Self::new(
            config.executable_path(),
            config.version_flag.clone(),
            compile_version_pattern("current_pattern", &config.current_pattern)?,
        ))
    }

    /// Path of the probed executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run the server with its version flag and parse standard output.
    ///
    /// The exit status is ignored; some builds exit non-zero after printing.
    ///
    /// # Errors
    ///
    /// - [`UpdaterError::ExecutableNotFound`] if the server binary is missing
    /// - [`UpdaterError::PatternNotFound`] if the output is not recognised
    /// - [`UpdaterError::CommandLaunchError`] if it cannot be started
    pub async fn query(&self) -> Result<ServerVersion, UpdaterError> {
        if !self.executable.is_file() {
            return Err(UpdaterError::ExecutableNotFound {
                path: self.executable.display().to_string(),
            });
        }

        let output = ToolCommand::new(&self.executable)
            .arg(self.flag.clone())
            .with_context("version")
            .execute()
            .await?;

        self.parse_output(&output.stdout)
    }

    /// Parse the server's version output.
    pub fn parse_output(&self, output: &str) -> Result<ServerVersion, UpdaterError> {
        self.pattern
            .captures(output)
            .and_then(|caps| version_from(&caps))
            .ok_or_else(|| UpdaterError::PatternNotFound {
                origin: self.executable.display().to_string(),
                pattern: self.pattern.as_str().to_string(),
            })
    }
}

/// Version from group 1, revision from group 2. `None` if the revision overflows.
fn version_from(caps: &Captures<'_>) -> Option<ServerVersion> {
    let version = caps.get(1)?.as_str();
    let revision = caps.get(2)?.as_str().parse::<u64>().ok()?;
    Some(ServerVersion::new(version, revision))
}
