//! HTTP access to the nightly site.
//!
//! [`PageFetcher`] wraps a single `reqwest` client used for both the listing
//! request and the installer download. Each request is one attempt; there are
//! no retries.
//!
//! The listing request is bounded by the configured timeout as a whole. The
//! download can legitimately take much longer, so there the timeout applies to
//! connecting and to every individual read instead.

use reqwest::{Client, Url};
use std::path::Path;
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::core::UpdaterError;

/// HTTP client for the listing page and installer downloads.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    /// Build a client with the given timeout.
    pub fn new(timeout: Duration) -> Result<Self, UpdaterError> {
        let client = Client::builder()
            .user_agent(concat!("updmtaserver/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .build()
            .map_err(|e| UpdaterError::ConfigError {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, timeout })
    }

    /// Fetch `url` and return the body as text.
    ///
    /// # Errors
    ///
    /// [`UpdaterError::NetworkError`] on timeout, connection failure, or a
    /// non-success status.
    pub async fn fetch_text(&self, url: &Url) -> Result<String, UpdaterError> {
        debug!("Fetching {}", url);

        let network_error = |reason: String| UpdaterError::NetworkError {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| network_error(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network_error(format!("HTTP {status}")));
        }

        response.text().await.map_err(|e| network_error(describe(&e)))
    }

    /// Stream `url` into `dest`, creating parent directories as needed.
    ///
    /// `on_progress` is called after every chunk with the bytes received so far
    /// and the total from `Content-Length`, if the server sent one. Returns the
    /// number of bytes written.
    ///
    /// # Errors
    ///
    /// [`UpdaterError::DownloadError`] on any network or I/O failure, a
    /// non-success status, or a read that stalls longer than the timeout.
    pub async fn download(
        &self,
        url: &Url,
        dest: &Path,
        on_progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<u64, UpdaterError> {
        let download_error = |reason: String| UpdaterError::DownloadError {
            url: url.to_string(),
            reason,
        };

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                download_error(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        info!("Downloading {} to {}", url, dest.display());

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| download_error(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(format!("HTTP {status}")));
        }

        let total = response.content_length();
        let mut file = File::create(dest)
            .await
            .map_err(|e| download_error(format!("cannot create {}: {e}", dest.display())))?;

        let mut received = 0u64;
        on_progress(received, total);

        loop {
            let chunk = tokio::time::timeout(self.timeout, response.chunk())
                .await
                .map_err(|_| {
                    download_error(format!(
                        "no data received for {} seconds",
                        self.timeout.as_secs()
                    ))
                })?
                .map_err(|e| download_error(describe(&e)))?;

            let Some(chunk) = chunk else {
                break;
            };

            file.write_all(&chunk)
                .await
                .map_err(|e| download_error(format!("cannot write {}: {e}", dest.display())))?;

            received += chunk.len() as u64;
            on_progress(received, total);
        }

        file.flush()
            .await
            .map_err(|e| download_error(format!("cannot write {}: {e}", dest.display())))?;

        debug!("Downloaded {} bytes", received);
        Ok(received)
    }
}

/// Short description of a reqwest error, distinguishing timeouts.
fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}
