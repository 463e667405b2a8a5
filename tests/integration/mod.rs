//! Integration test suite for updmtaserver
//!
//! End-to-end runs of the binary against a local nightly site, a fake server
//! executable, and a fake archive tool.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: argument handling and configuration discovery
//! - **update_flow**: up-to-date, outdated, anomalous and missing installs
//! - **error_scenarios**: failing lookups, tools, and file moves

// Shared test utilities (from parent tests/ directory)
#[cfg(unix)]
#[path = "../common/mod.rs"]
mod common;

mod cli;
#[cfg(unix)]
mod error_scenarios;
#[cfg(unix)]
mod update_flow;
