//! Command-line interface for `updmtaserver`.
//!
//! The tool has a single action: check the nightly listing and update the
//! installed server if a newer build exists. Flags only tune how that run
//! behaves and how much it prints.
//!
//! ```bash
//! updmtaserver                    # check, update if needed, wait for Enter
//! updmtaserver --check            # only report whether an update exists
//! updmtaserver -c server.toml -v  # custom configuration, debug logging
//! updmtaserver --no-pause         # for scheduled tasks
//! ```
//!
//! # Configuration Flow
//!
//! [`Cli`] is turned into a [`CliConfig`], which is applied to the process
//! environment and logging before the run. Tests build a `CliConfig` directly
//! and call [`Cli::execute_with_config`].


use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::UpdaterConfig;
use crate::constants::NO_PROGRESS_ENV;
use crate::report::TerminalReporter;
use crate::updater::{RunOutcome, Updater};

/// Settings derived from the command line that affect the whole process.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Filter directive for logging, e.g. `debug`.
    ///
    /// `None` turns logging off. `RUST_LOG` takes precedence when set.
    pub log_level: Option<String>,

    /// Hide progress bars (sets `MTASA_NO_PROGRESS`).
    pub no_progress: bool,

    /// Configuration file to load instead of the default lookup.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Export settings that other modules read from the environment.
    ///
    /// Call once, before the run starts.
    pub fn apply_to_env(&self) {
        if self.no_progress {
            // SAFETY: called from the main task before anything else reads or
            // writes the environment
            unsafe { std::env::set_var(NO_PROGRESS_ENV, "1") };
        }
    }

    /// Install the global `tracing` subscriber, writing to stderr.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("off"))
        });

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Keep an MTA:SA server on the latest nightly build.
#[derive(Parser, Debug)]
#[command(
    name = "updmtaserver",
    about = "Update an MTA:SA dedicated server to the latest nightly build",
    version,
    long_about = "Checks the MTA:SA nightly listing, compares the latest build with the \
                  installed server, and if it is newer downloads, extracts and installs it \
                  in place."
)]
pub struct Cli {
    /// Show debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging. Status lines are still printed.
    #[arg(short, long)]
    quiet: bool,

    /// Path to a configuration file.
    ///
    /// Defaults to `$MTASA_UPDATER_CONFIG`, then `./updmtaserver.toml`, then
    /// the user configuration directory.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable progress bars.
    #[arg(long)]
    no_progress: bool,

    /// Only report whether an update is available; never install.
    #[arg(long)]
    check: bool,

    /// Exit without waiting for Enter.
    ///
    /// Implied when standard input is not a terminal.
    #[arg(long)]
    no_pause: bool,
}

impl Cli {
    /// Run with settings taken from the parsed arguments.
    pub async fn execute(self) -> Result<RunOutcome> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate flags into a [`CliConfig`].
    ///
    /// `--verbose` selects `debug`, `--quiet` disables logging, and the
    /// default is `warn` so log lines stay out of the status readout.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    /// Whether to wait for Enter before exiting.
    #[must_use]
    pub const fn should_pause(&self) -> bool {
        !self.no_pause
    }

    /// Load configuration and perform one update run.
    ///
    /// # Errors
    ///
    /// Configuration problems and a failed Move step. Everything else is
    /// reported on the terminal and reflected in the returned [`RunOutcome`].
    pub async fn execute_with_config(self, config: CliConfig) -> Result<RunOutcome> {
        config.apply_to_env();
        config.init_logging();

        let updater_config = UpdaterConfig::load(config.config_path.as_deref())
            .await
            .context("Failed to load configuration")?;
        debug!("Using configuration: {:?}", updater_config);

        let updater = Updater::new(updater_config)?.check_only(self.check);
        let mut reporter = TerminalReporter::stdout(!config.no_progress);

        let outcome = updater.run(&mut reporter).await.context("Update failed")?;
        print_summary(&outcome);
        Ok(outcome)
    }
}

fn print_summary(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Updated { latest, .. } => {
            println!("{} {}", "Server updated to".green().bold(), latest.version);
        }
        RunOutcome::UpdateAvailable { latest, .. } => {
            println!("{} is available. Run without --check to install it.", latest.version);
        }
        _ => {}
    }
}

/// Block until the user presses Enter, if standard input is a terminal.
pub fn wait_for_enter() {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return;
    }

    print!("Press Enter to continue...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = stdin.lock().read_line(&mut line);
}
