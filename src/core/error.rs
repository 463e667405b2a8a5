//! Error handling for the updater
//!
//! Failures are modelled as a single strongly-typed enum, [`UpdaterError`], whose
//! variants map one-to-one onto the places a run can go wrong: fetching the
//! listing page, scraping it, querying the installed server, and each step of
//! the update pipeline.
//!
//! The CLI never prints an [`UpdaterError`] directly. Errors that escape to the
//! top level are converted by [`user_friendly_error`] into an [`ErrorContext`],
//! which adds a short explanation and a suggestion and renders them in color.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mta_server_updater::core::{UpdaterError, user_friendly_error};
//!
//! let error = UpdaterError::ToolMissing {
//!     tool: "7z".to_string(),
//! };
//! user_friendly_error(anyhow::Error::from(error)).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Every failure mode of an update run.
///
/// Fields carry the URL, path, or program involved so the message is useful on
/// its own. All fields are owned strings, which keeps the type `Clone` and easy
/// to stash inside pipeline state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdaterError {
    /// The listing page could not be retrieved.
    ///
    /// Covers timeouts, unreachable hosts, and non-success HTTP statuses.
    #[error("Failed to fetch {url}: {reason}")]
    NetworkError {
        /// The URL that was requested
        url: String,
        /// Transport error or HTTP status
        reason: String,
    },

    /// Text did not contain anything matching the expected version pattern.
    ///
    /// For the listing page this means no build is listed or the page layout
    /// changed. For the local server it means the `-v` output is unrecognised.
    #[error("No match for pattern `{pattern}` in {origin}")]
    PatternNotFound {
        /// Where the text came from (listing page URL or executable path)
        origin: String,
        /// The regular expression that failed to match
        pattern: String,
    },

    /// The installed server executable does not exist.
    #[error("Executable file {path} not found")]
    ExecutableNotFound {
        /// Path that was probed
        path: String,
    },

    /// Streaming the new build to disk failed.
    #[error("Failed to download {url}: {reason}")]
    DownloadError {
        /// Artifact URL
        url: String,
        /// Network, HTTP status, or I/O failure description
        reason: String,
    },

    /// The archive extraction tool is not on the search path.
    #[error("Extraction tool `{tool}` is not installed or not found in PATH")]
    ToolMissing {
        /// Name of the tool that was looked up
        tool: String,
    },

    /// The archive extraction tool ran but reported failure.
    #[error("`{tool}` exited with {status}")]
    ExtractionError {
        /// Name of the tool
        tool: String,
        /// Exit status description (e.g. `exit code 2`)
        status: String,
        /// Captured standard error, possibly empty
        stderr: String,
    },

    /// A filesystem operation failed while installing files.
    #[error("File system error during {operation}: {path}: {reason}")]
    FileSystemError {
        /// What was being attempted (e.g. "move", "create directory")
        operation: String,
        /// Path involved
        path: String,
        /// Underlying I/O error message
        reason: String,
    },

    /// A subprocess could not be started for a reason other than being absent.
    #[error("Failed to launch {program}: {reason}")]
    CommandLaunchError {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error message
        reason: String,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {message}")]
    ConfigError {
        /// What is wrong with it
        message: String,
    },
}

impl UpdaterError {
    /// Builds a [`UpdaterError::FileSystemError`] from an I/O error.
    pub fn file_system(
        operation: impl Into<String>,
        path: &std::path::Path,
        error: &std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            operation: operation.into(),
            path: path.display().to_string(),
            reason: error.to_string(),
        }
    }
}

/// An error wrapped with user-facing details and a suggestion.
///
/// Created by [`user_friendly_error`]; displayed by the binary just before it
/// exits with a failure status.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error message
    pub error: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new context with no suggestion or details.
    #[must_use]
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            error: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion.
///
/// The error chain is searched for an [`UpdaterError`] first, so context added
/// with `anyhow::Context` does not hide the specific guidance. The outermost
/// message is always kept as the headline.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let headline = format!("{error:#}");

    if let Some(updater_error) = error.chain().find_map(|e| e.downcast_ref::<UpdaterError>()) {
        return create_error_context(updater_error, headline);
    }

    if let Some(io_error) = error.chain().find_map(|e| e.downcast_ref::<std::io::Error>()) {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(headline)
                .with_suggestion("Run the updater from an account that can write to the server directory")
                .with_details("The operating system refused access to a file or directory");
        }
    }

    ErrorContext::new(headline)
}

fn create_error_context(error: &UpdaterError, headline: String) -> ErrorContext {
    let context = ErrorContext::new(headline);
    match error {
        UpdaterError::NetworkError { .. } => context
            .with_suggestion("Check your internet connection and that the nightly site is reachable")
            .with_details("The listing page is fetched once with no retries"),

        UpdaterError::PatternNotFound { .. } => context
            .with_suggestion("Check `latest_pattern` and `current_pattern` in the updater configuration")
            .with_details("The listing page layout or the server's version output may have changed"),

        UpdaterError::ExecutableNotFound { .. } => context
            .with_suggestion("Run the updater from the server directory or set `install_dir` in the configuration"),

        UpdaterError::DownloadError { .. } => context
            .with_suggestion("Try again later; the nightly build may still be uploading"),

        UpdaterError::ToolMissing { tool } => context
            .with_suggestion(format!("Please install {tool} and add it to your PATH"))
            .with_details("The server installer is unpacked with an external archive tool"),

        UpdaterError::ExtractionError { stderr, .. } => {
            let context = context.with_suggestion("Delete the tmp directory and run the updater again");
            if stderr.trim().is_empty() {
                context
            } else {
                context.with_details(stderr.trim().to_string())
            }
        }

        UpdaterError::FileSystemError { .. } => context
            .with_suggestion("Stop the server, check file permissions, and run the updater again")
            .with_details("The install may be partially updated; some files were not replaced"),

        UpdaterError::CommandLaunchError { .. } => context
            .with_suggestion("Check that the program is executable by the current user"),

        UpdaterError::ConfigError { .. } => context
            .with_suggestion("Fix the configuration file or remove it to use the built-in defaults"),
    }
}
