//! Progress indicators for long-running steps
//!
//! Thin wrapper over `indicatif` with the updater's styling. Bars draw to
//! stderr and hide themselves when stderr is not a terminal, so piped output
//! stays clean.
//!
//! # Environment Variables
//!
//! - `MTASA_NO_PROGRESS`: Set to any value to disable all progress indicators
//!
//! # Examples
//!
//! ```rust,no_run
//! use mta_server_updater::utils::progress::ProgressBar;
//!
//! let bar = ProgressBar::download(Some(46_137_344));
//! bar.set_prefix("Download");
//! bar.set_position(1_048_576);
//! bar.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

use crate::constants::NO_PROGRESS_ENV;

/// Whether `MTASA_NO_PROGRESS` is set.
pub fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// A progress bar with consistent styling.
///
/// Every method is a no-op on a hidden bar, so callers never need to check.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// A byte-count bar for a download.
    ///
    /// Without a known total the bar degrades to a spinner showing bytes
    /// received so far.
    pub fn download(total: Option<u64>) -> Self {
        if is_progress_disabled() {
            return Self::hidden();
        }

        let bar = match total {
            Some(len) => {
                let bar = IndicatifBar::new(len);
                bar.set_style(ProgressStyle::download());
                bar
            }
            None => {
                let bar = IndicatifBar::new_spinner();
                bar.set_style(ProgressStyle::bytes_spinner());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };
        Self { inner: bar }
    }

    /// A bar that never draws.
    pub fn hidden() -> Self {
        Self {
            inner: IndicatifBar::hidden(),
        }
    }

    /// Whether the bar draws anything.
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    /// The total, if known.
    pub fn length(&self) -> Option<u64> {
        self.inner.length()
    }

    /// Update the total once it becomes known.
    pub fn set_length(&self, len: u64) {
        if self.length() != Some(len) {
            self.inner.set_length(len);
            self.inner.set_style(ProgressStyle::download());
        }
    }

    pub fn set_position(&self, pos: u64) {
        self.inner.set_position(pos);
    }

    /// Remove the bar from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Styles used by [`ProgressBar`].
pub struct ProgressStyle;

impl ProgressStyle {
    /// Bytes received against total, with ETA.
    pub fn download() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| IndicatifStyle::default_bar())
            .progress_chars("━╸━")
    }

    /// Bytes received when the total is unknown.
    pub fn bytes_spinner() -> IndicatifStyle {
        IndicatifStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.cyan} {bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| IndicatifStyle::default_spinner())
    }
}
