//! Core types shared by every part of the updater.
//!
//! - [`UpdaterError`] - the typed failure taxonomy
//! - [`ErrorContext`] / [`user_friendly_error`] - presentation of top-level failures

pub mod error;

pub use error::{ErrorContext, UpdaterError, user_friendly_error};
