//! Process-execution bridge between the client and the `op` binary.
//!
//! Every call is a single child process awaited to completion. Failures are
//! folded into an [`ExecOutcome`] rather than returned as `Err`, so nothing
//! escapes the bridge boundary; callers decide how to classify the text.

#[cfg(feature = "mock")]
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Default cap on captured stdout (4 MiB).
pub const DEFAULT_MAX_OUTPUT: usize = 4096 * 1024;

/// Uniform result of one bridge invocation.
///
/// Serializes as `{"success": true, "data": "..."}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOutcome {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Captured stdout on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Failure description otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecOutcome {
    /// Successful outcome carrying stdout.
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    /// Failed outcome carrying a message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Converts into `Ok(stdout)` or `Err(message)`.
    pub fn into_result(self) -> std::result::Result<String, String> {
        if self.success {
            Ok(self.data.unwrap_or_default())
        } else {
            Err(self.error.unwrap_or_default())
        }
    }
}

/// Per-invocation knobs.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Maximum bytes of stdout to capture before the child is killed.
    pub max_output: usize,
    /// Extra environment variables for the child.
    pub env: Vec<(String, String)>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            max_output: DEFAULT_MAX_OUTPUT,
            env: Vec::new(),
        }
    }
}

/// Something that can run the `op` binary and shell commands.
///
/// [`ProcessRunner`] spawns real processes; the `mock` feature provides a
/// scripted runner for tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` directly (no shell) with `args`.
    async fn execute(&self, program: &str, args: &[String], options: &ExecOptions) -> ExecOutcome;

    /// Runs `command` through `shell -c`, or the platform shell when `None`.
    async fn execute_shell(
        &self,
        command: &str,
        shell: Option<&str>,
        options: &ExecOptions,
    ) -> ExecOutcome;
}

/// Runs commands as real child processes via `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Creates a new process runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn execute(&self, program: &str, args: &[String], options: &ExecOptions) -> ExecOutcome {
        let mut cmd = Command::new(program);
        cmd.args(args);
        let display = display_command(program, args);
        finish(run_captured(cmd, program, &display, options).await)
    }

    async fn execute_shell(
        &self,
        command: &str,
        shell: Option<&str>,
        options: &ExecOptions,
    ) -> ExecOutcome {
        let cmd = shell_command(command, shell);
        let program = shell.unwrap_or(DEFAULT_SHELL);
        finish(run_captured(cmd, program, command, options).await)
    }
}

#[cfg(windows)]
const DEFAULT_SHELL: &str = "cmd";
#[cfg(not(windows))]
const DEFAULT_SHELL: &str = "/bin/sh";

fn shell_command(command: &str, shell: Option<&str>) -> Command {
    match shell {
        Some(shell) => {
            let mut cmd = Command::new(shell);
            cmd.arg("-c").arg(command);
            cmd
        }
        None if cfg!(windows) => {
            let mut cmd = Command::new(DEFAULT_SHELL);
            cmd.arg("/C").arg(command);
            cmd
        }
        None => {
            let mut cmd = Command::new(DEFAULT_SHELL);
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn finish(result: std::result::Result<String, String>) -> ExecOutcome {
    match result {
        Ok(stdout) => ExecOutcome::ok(stdout),
        Err(message) => ExecOutcome::failed(message),
    }
}

async fn read_limited<R>(reader: R, limit: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader.take(limit as u64 + 1).read_to_end(&mut buf).await?;
    Ok(buf)
}

async fn run_captured(
    mut cmd: Command,
    program: &str,
    command_line: &str,
    options: &ExecOptions,
) -> std::result::Result<String, String> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    debug!(command = %command_line, "spawning process");

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            format!("spawn {} ENOENT", program)
        } else {
            format!("spawn {} {}", program, e)
        }
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| "stdout was not captured".to_string())?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| "stderr was not captured".to_string())?;

    let limit = options.max_output;
    let stderr_task = tokio::spawn(read_limited(stderr, limit));

    let out = read_limited(stdout, limit)
        .await
        .map_err(|e| format!("failed to read stdout of {}: {}", program, e))?;

    if out.len() > limit {
        warn!(command = %command_line, limit, "output exceeded limit, killing process");
        let _ = child.kill().await;
        stderr_task.abort();
        return Err("stdout maxBuffer length exceeded".to_string());
    }

    let status = child
        .wait()
        .await
        .map_err(|e| format!("failed to wait for {}: {}", program, e))?;

    let err = match stderr_task.await {
        Ok(Ok(bytes)) => bytes,
        _ => Vec::new(),
    };

    if !status.success() {
        let stderr = String::from_utf8_lossy(&err);
        debug!(command = %command_line, code = status.code().unwrap_or(-1), "process failed");
        return Err(format!("Command failed: {}\n{}", command_line, stderr.trim_end()));
    }

    debug!(command = %command_line, bytes = out.len(), "process succeeded");

    String::from_utf8(out).map_err(|e| format!("Invalid UTF-8 in command output: {}", e))
}
