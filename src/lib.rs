//! MTA:SA server updater
//!
//! Keeps an MTA:SA dedicated server on the latest nightly build. A run fetches
//! the nightly listing page, reads the newest build's version and revision,
//! asks the installed server for its own, and when the listing is newer
//! downloads the installer, extracts the server files with 7-Zip and moves
//! them over the installation.
//!
//! # Architecture Overview
//!
//! - [`updater`] - one check-and-update run, start to finish
//! - [`fetch`] - HTTP access for the listing page and the download
//! - [`version`] - scraping, version probing, and revision comparison
//! - [`pipeline`] - the Download, Extract, Move and Clean steps
//! - [`report`] - observer interface and the terminal status display
//!
//! ## Supporting Modules
//! - [`cli`] - command-line flags and process setup
//! - [`config`] - `updmtaserver.toml` loading and validation
//! - [`constants`] - defaults used when no configuration overrides them
//! - [`core`] - error types and user-facing error formatting
//! - [`process`] - subprocess execution with captured output
//! - [`utils`] - file moves and progress bars
//!
//! # Example
//!
//! ```rust,no_run
//! use mta_server_updater::config::UpdaterConfig;
//! use mta_server_updater::report::TerminalReporter;
//! use mta_server_updater::updater::Updater;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UpdaterConfig::load(None).await?;
//! let updater = Updater::new(config)?.check_only(true);
//! let outcome = updater.run(&mut TerminalReporter::stdout(true)).await?;
//! println!("{:?}", outcome.status());
//! # Ok(())
//! # }
//! ```
//!
//! # Error Model
//!
//! Lookup failures and a failed Download or Extract end the run normally and
//! are described by [`updater::RunOutcome`]. A failed Move, which may leave
//! the installation partially replaced, is returned as an error.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod updater;
pub mod utils;
pub mod version;

// test_utils is available for tests and with the test-utils feature
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
