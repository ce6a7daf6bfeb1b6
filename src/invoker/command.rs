use super::GenerationInvoker;
use crate::config::AppscribeConfig;
use crate::error::InvokeError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, error, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs an external command line tool once per prompt.
///
/// The prompt is passed as the final argument. Only stdout is treated as the
/// response; stderr is kept for error reporting.
pub struct CommandInvoker {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    disable_output_buffering: bool,
}

impl CommandInvoker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
            disable_output_buffering: false,
        }
    }

    pub fn from_config(config: &AppscribeConfig) -> Self {
        Self::new(config.tool_command.clone(), config.tool_args.clone())
            .with_timeout(config.timeout())
            .with_output_buffering_disabled(config.disable_output_buffering)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Asks the child to flush its output as it goes (`PYTHONUNBUFFERED=1`).
    /// Only the child's environment is touched.
    pub fn with_output_buffering_disabled(mut self, disabled: bool) -> Self {
        self.disable_output_buffering = disabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if self.disable_output_buffering {
            command.env("PYTHONUNBUFFERED", "1");
        }
        command
    }

    fn spawn_error(&self, e: std::io::Error) -> InvokeError {
        InvokeError::Spawn {
            program: self.program.clone(),
            message: e.to_string(),
        }
    }

    /// Checks that the tool can be launched, returning its `--version` banner.
    pub async fn probe(&self) -> Result<String, InvokeError> {
        let mut command = self.command();
        command.arg("--version");
        let child = command.spawn().map_err(|e| self.spawn_error(e))?;

        let output = match tokio::time::timeout(PROBE_TIMEOUT, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(InvokeError::Other {
                    message: format!("Failed to read {} output: {}", self.program, e),
                })
            }
            Err(_) => {
                return Err(InvokeError::Timeout {
                    seconds: PROBE_TIMEOUT.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(InvokeError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

#[async_trait]
impl GenerationInvoker for CommandInvoker {
    async fn generate(&self, prompt: &str) -> Result<String, InvokeError> {
        let start = Instant::now();

        let mut command = self.command();
        command.args(&self.args).arg(prompt);
        let child = command.spawn().map_err(|e| {
            error!(program = %self.program, error = %e, "Failed to start generation tool");
            self.spawn_error(e)
        })?;

        // Dropping the child on timeout kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                error!(program = %self.program, error = %e, "Failed to collect tool output");
                return Err(InvokeError::Other {
                    message: format!("Failed to read {} output: {}", self.program, e),
                });
            }
            Err(_) => {
                error!(
                    program = %self.program,
                    timeout_secs = self.timeout.as_secs(),
                    "Generation tool timed out, killed"
                );
                return Err(InvokeError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            warn!(
                program = %self.program,
                status = ?output.status.code(),
                stderr = %stderr.trim(),
                "Generation tool failed"
            );
            return Err(InvokeError::Failed {
                status: output.status.code(),
                stderr,
            });
        }

        debug!(
            program = %self.program,
            stdout_len = stdout.len(),
            stderr_len = stderr.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Generation tool finished"
        );

        Ok(stdout)
    }

    fn name(&self) -> &str {
        &self.program
    }
}

impl std::fmt::Debug for CommandInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandInvoker")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("timeout", &self.timeout)
            .field("disable_output_buffering", &self.disable_output_buffering)
            .finish()
    }
}
