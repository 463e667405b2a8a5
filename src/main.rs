//! `updmtaserver` entry point
//!
//! Parses arguments, runs one update check on a single-threaded runtime,
//! prints hard errors with context, and waits for Enter before exiting so the
//! console window stays open when launched by double-click.

use clap::Parser;
use mta_server_updater::cli::{self, Cli};
use mta_server_updater::core::user_friendly_error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let pause = cli.should_pause();

    let code = match cli.execute().await {
        Ok(_) => 0,
        Err(e) => {
            user_friendly_error(e).display();
            1
        }
    };

    if pause {
        cli::wait_for_enter();
    }

    std::process::exit(code);
}
