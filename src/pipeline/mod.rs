//! The four-step install pipeline.
//!
//! Once a newer build is known, [`UpdatePipeline::run`] executes:
//!
//! 1. **Download** the installer into the temp directory
//! 2. **Extract** the server tree from it with the archive tool
//! 3. **Move** the extracted files over the installation
//! 4. **Clean** up the temp directory
//!
//! Each step reports its start and outcome to an [`UpdateObserver`]. A failed
//! Download or Extract stops the pipeline in [`PipelineState::Failed`] and the
//! run ends normally. A failed Move is returned as an error, because the
//! installation may now be half-updated. A failed Clean is only recorded.

use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::UpdaterConfig;
use crate::core::UpdaterError;
use crate::fetch::PageFetcher;
use crate::process::ToolCommand;
use crate::report::UpdateObserver;
use crate::utils::fs::{move_tree, remove_dir_all};

/// A reported unit of work.
///
/// The two lookup phases are reported the same way as the pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Fetching and scraping the listing page
    RetrieveLatest,
    /// Running the installed server's version query
    QueryInstalled,
    Download,
    Extract,
    Move,
    Clean,
}

impl Step {
    /// Pipeline steps in execution order.
    pub const PIPELINE: [Self; 4] = [Self::Download, Self::Extract, Self::Move, Self::Clean];

    /// Human-readable name used in status lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::RetrieveLatest => "Retrieving latest version",
            Self::QueryInstalled => "Querying installed server",
            Self::Download => "Download",
            Self::Extract => "Extract",
            Self::Move => "Move",
            Self::Clean => "Clean",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Failed(UpdaterError),
}

impl StepOutcome {
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub const fn error(&self) -> Option<&UpdaterError> {
        match self {
            Self::Done => None,
            Self::Failed(error) => Some(error),
        }
    }
}

impl<T> From<&Result<T, UpdaterError>> for StepOutcome {
    fn from(result: &Result<T, UpdaterError>) -> Self {
        match result {
            Ok(_) => Self::Done,
            Err(e) => Self::Failed(e.clone()),
        }
    }
}

/// Where the pipeline is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Downloading,
    Extracting,
    Moving,
    Cleaning,
    /// All files are installed. Cleanup may still have failed; see
    /// [`UpdatePipeline::cleanup_error`].
    Done,
    /// A step failed and the remaining steps were skipped.
    Failed { step: Step, cause: UpdaterError },
}

impl PipelineState {
    const fn for_step(step: Step) -> Self {
        match step {
            Step::Download => Self::Downloading,
            Step::Extract => Self::Extracting,
            Step::Move => Self::Moving,
            Step::Clean => Self::Cleaning,
            Step::RetrieveLatest | Step::QueryInstalled => Self::Idle,
        }
    }

    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Downloads, extracts and installs one build.
///
/// Paths are taken from [`UpdaterConfig`] at construction; relative paths are
/// relative to the process working directory.
#[derive(Debug)]
pub struct UpdatePipeline {
    fetcher: PageFetcher,
    download_path: PathBuf,
    temp_dir: PathBuf,
    extracted_dir: PathBuf,
    install_dir: PathBuf,
    extract_tool: String,
    extract_args: Vec<String>,
    state: PipelineState,
    cleanup_error: Option<UpdaterError>,
}

impl UpdatePipeline {
    pub fn new(config: &UpdaterConfig, fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            download_path: config.download_path(),
            temp_dir: config.temp_dir.clone(),
            extracted_dir: config.extracted_dir(),
            install_dir: config.install_dir.clone(),
            extract_tool: config.extract_tool.clone(),
            extract_args: config.expanded_extract_args(),
            state: PipelineState::Idle,
            cleanup_error: None,
        }
    }

    pub const fn state(&self) -> &PipelineState {
        &self.state
    }

    /// The Clean failure, if cleanup did not succeed.
    pub const fn cleanup_error(&self) -> Option<&UpdaterError> {
        self.cleanup_error.as_ref()
    }

    /// Install the build at `url`.
    ///
    /// Returns the final state, which is either [`PipelineState::Done`] or a
    /// [`PipelineState::Failed`] for Download or Extract.
    ///
    /// # Errors
    ///
    /// Returns the [`UpdaterError::FileSystemError`] of a failed Move step. The
    /// state is `Failed` in that case too.
    pub async fn run(
        &mut self,
        url: &Url,
        observer: &mut dyn UpdateObserver,
    ) -> Result<PipelineState, UpdaterError> {
        info!("Installing {} into {}", url, self.install_dir.display());

        for step in Step::PIPELINE {
            self.state = PipelineState::for_step(step);
            observer.on_step_start(step);

            let result = match step {
                Step::Download => self.download(url, observer).await,
                Step::Extract => self.extract().await,
                Step::Move => self.install(),
                Step::Clean => self.clean(),
                Step::RetrieveLatest | Step::QueryInstalled => Ok(()),
            };
            observer.on_step_end(step, &StepOutcome::from(&result));

            let Err(cause) = result else {
                continue;
            };

            if step == Step::Clean {
                warn!("Cleanup failed: {}", cause);
                self.cleanup_error = Some(cause);
                break;
            }

            warn!("{} failed: {}", step, cause);
            self.state = PipelineState::Failed {
                step,
                cause: cause.clone(),
            };
            if step == Step::Move {
                return Err(cause);
            }
            return Ok(self.state.clone());
        }

        self.state = PipelineState::Done;
        Ok(self.state.clone())
    }

    async fn download(
        &self,
        url: &Url,
        observer: &mut dyn UpdateObserver,
    ) -> Result<(), UpdaterError> {
        let mut on_progress =
            |received: u64, total: Option<u64>| observer.on_download_progress(received, total);
        let bytes = self.fetcher.download(url, &self.download_path, &mut on_progress).await?;
        debug!("Saved {} bytes to {}", bytes, self.download_path.display());
        Ok(())
    }

    async fn extract(&self) -> Result<(), UpdaterError> {
        let tool = which::which(&self.extract_tool).map_err(|_| UpdaterError::ToolMissing {
            tool: self.extract_tool.clone(),
        })?;

        let output = ToolCommand::new(&tool)
            .args(self.extract_args.iter().cloned())
            .with_context("extract")
            .execute()
            .await?;

        if output.success() {
            return Ok(());
        }

        Err(UpdaterError::ExtractionError {
            tool: self.extract_tool.clone(),
            status: output.status_description(),
            stderr: output.stderr.trim().to_string(),
        })
    }

    fn install(&self) -> Result<(), UpdaterError> {
        let moved = move_tree(&self.extracted_dir, &self.install_dir)?;
        info!("Installed {} files into {}", moved.len(), self.install_dir.display());
        Ok(())
    }

    fn clean(&self) -> Result<(), UpdaterError> {
        remove_dir_all(&self.temp_dir)
    }
}
