//! Builder for running external programs with captured output
//!
//! Both subprocesses the updater needs (the server's version query and the
//! archive tool) go through [`ToolCommand`], so launch failures are converted
//! into [`UpdaterError`] variants in one place and every invocation is logged
//! the same way.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::core::UpdaterError;

/// Fluent builder for a single external program invocation.
///
/// Output is always captured. There is no timeout: the call suspends the run
/// until the program exits.
///
/// # Examples
///
/// ```rust,no_run
/// use mta_server_updater::process::ToolCommand;
///
/// # async fn example() -> Result<(), mta_server_updater::core::UpdaterError> {
/// let output = ToolCommand::new("7z")
///     .args(["x", "-tnsis", "tmp/mtaserver.exe"])
///     .with_context("extract")
///     .execute()
///     .await?;
///
/// if !output.success() {
///     eprintln!("7z failed with {}", output.status_description());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ToolCommand {
    /// Program name (searched on PATH) or path
    program: PathBuf,

    /// Arguments in the order they are passed
    args: Vec<String>,

    /// Optional label used in log lines
    context: Option<String>,
}

impl ToolCommand {
    /// Creates a builder for `program` with no arguments.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: PathBuf::from(program.as_ref()),
            args: Vec::new(),
            context: None,
        }
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set a label for log messages (e.g. the pipeline step)
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Run the program to completion and capture its output.
    ///
    /// A non-zero exit status is not an error here; callers decide what a
    /// failed run means for them via [`ToolOutput::success`].
    ///
    /// # Errors
    ///
    /// - [`UpdaterError::ExecutableNotFound`] if the program does not exist
    /// - [`UpdaterError::CommandLaunchError`] if it exists but cannot be started
    pub async fn execute(self) -> Result<ToolOutput, UpdaterError> {
        let start = std::time::Instant::now();
        let program = self.program.display().to_string();
        let context = self.context.as_deref().unwrap_or("command");

        tracing::debug!(
            target: "process",
            "({}) Executing: {} {}",
            context,
            program,
            self.args.join(" ")
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    UpdaterError::ExecutableNotFound {
                        path: program.clone(),
                    }
                } else {
                    UpdaterError::CommandLaunchError {
                        program: program.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stdout.trim().is_empty() {
            tracing::debug!(target: "process", "({}) {}", context, stdout.trim());
        }
        if !stderr.trim().is_empty() {
            tracing::debug!(target: "process", "({}) stderr: {}", context, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "process::perf",
                "({}) {} took {:.2}s",
                context,
                program,
                elapsed.as_secs_f64()
            );
        }

        Ok(ToolOutput {
            status: output.status,
            stdout,
            stderr,
        })
    }
}

/// Captured result of a [`ToolCommand`].
#[derive(Debug)]
pub struct ToolOutput {
    /// Exit status of the process
    pub status: ExitStatus,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Human-readable exit status, e.g. `exit code 2`.
    #[must_use]
    pub fn status_description(&self) -> String {
        match self.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "no exit code (terminated by signal)".to_string(),
        }
    }
}
