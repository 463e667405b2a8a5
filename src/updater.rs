//! Update orchestration.
//!
//! [`Updater::run`] drives one complete check-and-update:
//!
//! 1. fetch the listing page and scrape the latest build
//! 2. ask the installed server for its version
//! 3. compare revisions
//! 4. run the [`UpdatePipeline`] if the listing is newer
//!
//! Lookup failures and Download/Extract failures end the run with a
//! [`RunOutcome`] describing what happened. Only errors that can leave the
//! installation broken (a failed Move) come back as `Err`.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::UpdaterConfig;
use crate::core::UpdaterError;
use crate::fetch::PageFetcher;
use crate::pipeline::{PipelineState, Step, StepOutcome, UpdatePipeline};
use crate::report::UpdateObserver;
use crate::version::{
    LatestBuild, ListingScraper, ServerVersion, UpdateStatus, VersionProbe, compare,
};

/// How an update run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The listing could not be fetched or contained no build.
    LookupFailed { step: Step, cause: UpdaterError },
    /// No server is installed at the configured path; nothing was changed.
    NotInstalled { executable: PathBuf },
    UpToDate { current: ServerVersion },
    /// The installed revision is newer than anything listed.
    Anomalous { latest: ServerVersion, current: ServerVersion },
    /// A newer build exists but `check_only` was set.
    UpdateAvailable { latest: LatestBuild, current: ServerVersion },
    /// The new build was installed.
    Updated {
        latest: LatestBuild,
        previous: ServerVersion,
        /// Set when the temp directory could not be removed.
        cleanup_error: Option<UpdaterError>,
    },
    /// Download or Extract failed; the installation is untouched.
    UpdateFailed { step: Step, cause: UpdaterError },
}

impl RunOutcome {
    /// The comparison result, if the run got that far.
    pub const fn status(&self) -> Option<UpdateStatus> {
        match self {
            Self::LookupFailed { .. } | Self::NotInstalled { .. } => None,
            Self::UpToDate { .. } => Some(UpdateStatus::UpToDate),
            Self::Anomalous { .. } => Some(UpdateStatus::Anomalous),
            Self::UpdateAvailable { .. } | Self::Updated { .. } | Self::UpdateFailed { .. } => {
                Some(UpdateStatus::NeedsUpdate)
            }
        }
    }
}

/// Checks for and installs nightly server builds.
#[derive(Debug)]
pub struct Updater {
    config: UpdaterConfig,
    fetcher: PageFetcher,
    scraper: ListingScraper,
    probe: VersionProbe,
    check_only: bool,
}

impl Updater {
    /// Build an updater from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`UpdaterError::ConfigError`] if a pattern or the listing URL is
    /// invalid, or the HTTP client cannot be created.
    pub fn new(config: UpdaterConfig) -> Result<Self, UpdaterError> {
        let fetcher = PageFetcher::new(config.http_timeout())?;
        let scraper = ListingScraper::from_config(&config)?;
        let probe = VersionProbe::from_config(&config)?;

        Ok(Self {
            config,
            fetcher,
            scraper,
            probe,
            check_only: false,
        })
    }

    /// Stop after comparing versions instead of installing.
    #[must_use]
    pub const fn check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    pub const fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Fetch the listing page and find the newest build on it.
    pub async fn latest(&self) -> Result<LatestBuild, UpdaterError> {
        let url = self.config.listing_url()?;
        let html = self.fetcher.fetch_text(&url).await?;
        self.scraper.scrape(&html)
    }

    /// Run one check, installing the latest build if it is newer.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed Move step. Every other failure is
    /// reported to `observer` and described by the returned [`RunOutcome`].
    pub async fn run(
        &self,
        observer: &mut dyn UpdateObserver,
    ) -> Result<RunOutcome, UpdaterError> {
        observer.on_step_start(Step::RetrieveLatest);
        let latest = self.latest().await;
        observer.on_step_end(Step::RetrieveLatest, &StepOutcome::from(&latest));
        let latest = match latest {
            Ok(latest) => latest,
            Err(cause) => {
                warn!("Could not determine the latest build: {}", cause);
                return Ok(RunOutcome::LookupFailed {
                    step: Step::RetrieveLatest,
                    cause,
                });
            }
        };
        debug!("Latest build {} at {}", latest.version, latest.url);

        observer.on_step_start(Step::QueryInstalled);
        let current = self.probe.query().await;
        observer.on_step_end(Step::QueryInstalled, &StepOutcome::from(&current));
        let current = match current {
            Ok(current) => current,
            Err(UpdaterError::ExecutableNotFound { .. }) => {
                info!("No server installed at {}", self.probe.executable().display());
                return Ok(RunOutcome::NotInstalled {
                    executable: self.probe.executable().to_path_buf(),
                });
            }
            Err(cause) => {
                warn!("Could not determine the installed version: {}", cause);
                return Ok(RunOutcome::LookupFailed {
                    step: Step::QueryInstalled,
                    cause,
                });
            }
        };

        observer.on_versions(&latest.version, &current);
        let status = compare(&latest.version, &current);
        observer.on_status(status);

        match status {
            UpdateStatus::UpToDate => return Ok(RunOutcome::UpToDate { current }),
            UpdateStatus::Anomalous => {
                warn!(
                    "Installed revision {} is newer than the latest listed revision {}",
                    current.revision, latest.version.revision
                );
                return Ok(RunOutcome::Anomalous {
                    latest: latest.version,
                    current,
                });
            }
            UpdateStatus::NeedsUpdate if self.check_only => {
                return Ok(RunOutcome::UpdateAvailable { latest, current });
            }
            UpdateStatus::NeedsUpdate => {}
        }

        info!("Updating {} -> {}", current, latest.version);
        let mut pipeline = UpdatePipeline::new(&self.config, self.fetcher.clone());
        match pipeline.run(&latest.url, observer).await? {
            PipelineState::Failed { step, cause } => Ok(RunOutcome::UpdateFailed { step, cause }),
            _ => Ok(RunOutcome::Updated {
                cleanup_error: pipeline.cleanup_error().cloned(),
                latest,
                previous: current,
            }),
        }
    }
}
