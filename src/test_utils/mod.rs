//! Test utilities for the updater
//!
//! Helpers shared by unit tests and the integration suite:
//!
//! - [`init_test_logging`] - once-only tracing setup that writes through the test harness
//! - [`FixtureServer`] - a tiny HTTP server serving canned listing pages and installers
//! - [`fixtures`] - listing HTML and fake server/tool scripts
//!
//! Available under `cfg(test)` and with the `test-utils` feature.

pub mod fixtures;

pub use fixtures::{FixtureServer, listing_page};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` if given, otherwise `RUST_LOG`. Does nothing if neither is set.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
