//! Sequential stream dispatch.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::command::{CommandBuilder, Invocation};
use crate::config::{ConfigResolver, GlobalConfig};
use crate::{Error, Result};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Create a `tokio::process::Command` with `CREATE_NO_WINDOW` applied on Windows.
fn tokio_command(program: impl AsRef<OsStr>) -> tokio::process::Command {
    #[allow(unused_mut)]
    let mut cmd = tokio::process::Command::new(program);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        cmd.as_std_mut().creation_flags(CREATE_NO_WINDOW);
    }
    cmd
}

/// Executes one built invocation of the download tool.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run to completion. Any failure is reported as [`Error::Dispatch`].
    async fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Spawns the tool as a child process, inheriting stdout/stderr so the
/// tool's own progress output reaches the operator.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child when it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        let stream = invocation.stream.as_str();
        debug!("Spawning {} for stream {}", invocation.program, stream);

        let mut command = tokio_command(&invocation.program);
        command
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| {
            Error::dispatch(stream, format!("failed to spawn {}: {}", invocation.program, e))
        })?;

        let status = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    warn!("{} timed out after {:?}, killing", invocation.program, timeout);
                    if let Err(e) = child.kill().await {
                        error!("Failed to kill {}: {}", invocation.program, e);
                    }
                    return Err(Error::dispatch(
                        stream,
                        format!("timed out after {}s", timeout.as_secs_f64()),
                    ));
                }
            },
            None => child.wait().await,
        }
        .map_err(|e| Error::dispatch(stream, format!("failed to wait for process: {e}")))?;

        if !status.success() {
            return Err(Error::dispatch(stream, format!("{} exited with {}", invocation.program, status)));
        }
        Ok(())
    }
}

/// Dispatch behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    /// Abort on the first failing stream instead of continuing.
    pub fail_fast: bool,
    /// Log each command line without running it.
    pub dry_run: bool,
}

/// What happened to one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed,
    Skipped,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamReport {
    pub name: String,
    /// Rendered command line, absent when the invocation could not be built.
    pub command: Option<String>,
    pub outcome: StreamOutcome,
}

/// Per-stream outcomes, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub reports: Vec<StreamReport>,
}

impl DispatchSummary {
    fn count(&self, pred: impl Fn(&StreamOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, StreamOutcome::Completed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, StreamOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, StreamOutcome::Failed { .. }))
    }

    pub fn failed_streams(&self) -> impl Iterator<Item = &str> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, StreamOutcome::Failed { .. }))
            .map(|r| r.name.as_str())
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Resolves, builds and runs every stream in manifest order, one at a time.
pub struct Dispatcher<R> {
    runner: R,
    resolver: ConfigResolver,
    builder: CommandBuilder,
    options: DispatchOptions,
}

impl<R: ToolRunner> Dispatcher<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            resolver: ConfigResolver::new(),
            builder: CommandBuilder::new(),
            options: DispatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn run(&self, global: &GlobalConfig) -> Result<DispatchSummary> {
        info!("dispatching {} streams", global.streams.len());
        let mut summary = DispatchSummary::default();

        for stream in &global.streams {
            let resolved = self.resolver.resolve(global, stream);

            let (command, result) = match self.builder.build(&resolved) {
                Ok(invocation) => {
                    let command = invocation.command_line();
                    let result = if self.options.dry_run {
                        info!("[dry-run] {}", command);
                        None
                    } else {
                        Some(self.runner.run(&invocation).await)
                    };
                    (Some(command), result)
                }
                Err(e) => (None, Some(Err(e))),
            };

            let outcome = match result {
                None => StreamOutcome::Skipped,
                Some(Ok(())) => {
                    info!("Finished: {}", stream.name);
                    StreamOutcome::Completed
                }
                Some(Err(e)) => {
                    error!("Stream {} failed: {}", stream.name, e);
                    if self.options.fail_fast {
                        return Err(match e {
                            Error::Dispatch { .. } => e,
                            other => Error::dispatch(&stream.name, other.to_string()),
                        });
                    }
                    StreamOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            summary.reports.push(StreamReport {
                name: stream.name.clone(),
                command,
                outcome,
            });
        }

        info!(
            "dispatch finished: {} completed, {} failed, {} skipped",
            summary.completed(),
            summary.failed(),
            summary.skipped()
        );
        if !summary.is_success() {
            let failed: Vec<_> = summary.failed_streams().collect();
            warn!("failed streams: {}", failed.join(", "));
        }

        Ok(summary)
    }
}
