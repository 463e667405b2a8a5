//! Progress reporting for update runs.
//!
//! The orchestrator and the pipeline never print. They report to an
//! [`UpdateObserver`], and the observer decides what the user sees:
//!
//! - [`TerminalReporter`] prints status lines and a download progress bar
//! - [`RecordingObserver`] keeps every event for later inspection

mod recording;
mod terminal;

pub use recording::{ObserverEvent, RecordingObserver};
pub use terminal::TerminalReporter;

use crate::pipeline::{Step, StepOutcome};
use crate::version::{ServerVersion, UpdateStatus};

/// Receives progress events from an update run.
///
/// Every `on_step_start` is followed by exactly one `on_step_end` for the same
/// step before the next step starts.
pub trait UpdateObserver {
    fn on_step_start(&mut self, step: Step);

    fn on_step_end(&mut self, step: Step, outcome: &StepOutcome);

    /// Bytes received so far, and the total if the server announced one.
    ///
    /// Only sent while [`Step::Download`] is running. The default ignores it.
    fn on_download_progress(&mut self, _received: u64, _total: Option<u64>) {}

    fn on_versions(&mut self, latest: &ServerVersion, current: &ServerVersion);

    fn on_status(&mut self, status: UpdateStatus);
}
