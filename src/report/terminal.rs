use colored::Colorize;
use std::io::{self, Write};

use super::UpdateObserver;
use crate::core::user_friendly_error;
use crate::pipeline::{Step, StepOutcome};
use crate::utils::progress::ProgressBar;
use crate::version::{ServerVersion, UpdateStatus};

/// Prints a run as status lines.
///
/// Each step shows as `Name: ...` and is rewritten in place to `Name: Done`
/// or `Name: Error`, followed by the error on its own line. While downloading
/// with progress enabled, a byte progress bar replaces the pending line.
///
/// ```text
/// Retrieving latest version: Done
/// Querying installed server: Done
///   - Latest version: v1.6.0-22451
///   - Current version: v1.6.0-22300
/// Needs update
/// Download: Done
/// Extract: Done
/// Move: Done
/// Clean: Done
/// ```
///
/// Write errors are ignored.
pub struct TerminalReporter<W: Write = io::Stdout> {
    out: W,
    show_progress: bool,
    bar: Option<ProgressBar>,
}

impl TerminalReporter<io::Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout(show_progress: bool) -> Self {
        Self::new(io::stdout(), show_progress)
    }
}

impl<W: Write> TerminalReporter<W> {
    pub const fn new(out: W, show_progress: bool) -> Self {
        Self {
            out,
            show_progress,
            bar: None,
        }
    }

    /// Consume the reporter and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn start_download_bar(&mut self) -> bool {
        if !self.show_progress {
            return false;
        }

        let bar = ProgressBar::download(None);
        if bar.is_hidden() {
            return false;
        }

        bar.set_prefix(Step::Download.label());
        self.bar = Some(bar);
        true
    }
}

impl<W: Write> UpdateObserver for TerminalReporter<W> {
    fn on_step_start(&mut self, step: Step) {
        if step == Step::Download && self.start_download_bar() {
            return;
        }

        let _ = write!(self.out, "{step}: ...");
        let _ = self.out.flush();
    }

    fn on_step_end(&mut self, step: Step, outcome: &StepOutcome) {
        let lead = match self.bar.take() {
            Some(bar) => {
                bar.finish_and_clear();
                ""
            }
            None => "\r",
        };

        let result = match outcome {
            StepOutcome::Done => "Done".green(),
            StepOutcome::Failed(_) => "Error".red().bold(),
        };
        let _ = writeln!(self.out, "{lead}{step}: {result}");

        if let Some(error) = outcome.error() {
            let context = user_friendly_error(error.clone().into());
            let _ = writeln!(self.out, "  - {}", context.error.red());
            if let Some(suggestion) = &context.suggestion {
                let _ = writeln!(self.out, "    {}", suggestion.dimmed());
            }
        }
    }

    fn on_download_progress(&mut self, received: u64, total: Option<u64>) {
        if let Some(bar) = &self.bar {
            if let Some(total) = total {
                bar.set_length(total);
            }
            bar.set_position(received);
        }
    }

    fn on_versions(&mut self, latest: &ServerVersion, current: &ServerVersion) {
        let _ = writeln!(self.out, "  - Latest version: {}", latest.to_string().bold());
        let _ = writeln!(self.out, "  - Current version: {}", current.to_string().bold());
    }

    fn on_status(&mut self, status: UpdateStatus) {
        let line = match status {
            UpdateStatus::NeedsUpdate => "Needs update".yellow().bold(),
            UpdateStatus::UpToDate => "Up to date".green().bold(),
            UpdateStatus::Anomalous => {
                "Installed build is newer than the latest nightly, nothing to do".yellow()
            }
        };
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}
