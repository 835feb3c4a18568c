//! External tool invocation
//!
//! Every external collaborator (compiler, syntax checker, doc extractor) is
//! run through here: async spawn with optional timeout, stdout/stderr capture
//! with size-capped truncation, and working-directory control. A tool failure
//! becomes a value, never a panic.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::BuildError;

/// Maximum captured output size before truncation (in bytes)
const MAX_OUTPUT_SIZE: usize = 100_000;

/// Truncation marker for large outputs
const TRUNCATION_MARKER: &str = "\n... [output truncated] ...\n";

/// Options for a tool invocation
#[derive(Debug, Clone)]
pub struct ToolOptions {
    /// Working directory for the tool
    pub working_dir: Option<PathBuf>,
    /// Environment variables to set
    pub env: HashMap<String, String>,
    /// Timeout duration (None = no timeout)
    pub timeout: Option<Duration>,
    /// Maximum captured output size before truncation
    pub max_output_size: usize,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            working_dir: None,
            env: HashMap::new(),
            timeout: None,
            max_output_size: MAX_OUTPUT_SIZE,
        }
    }
}

impl ToolOptions {
    /// Create options with a working directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Set the timeout; zero seconds means unbounded
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Add an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Result of a tool invocation
#[derive(Debug)]
pub struct ToolOutcome {
    /// Whether the tool succeeded (exit code 0)
    pub success: bool,
    /// Exit code if available
    pub exit_code: Option<i32>,
    /// Captured standard output (may be truncated)
    pub stdout: String,
    /// Whether stdout was truncated
    pub stdout_truncated: bool,
    /// Captured standard error
    pub stderr: String,
    /// Whether stderr was truncated
    pub stderr_truncated: bool,
    /// Wall-clock duration
    pub duration: Duration,
}

/// Render a program and arguments as a display string for logs and errors
pub fn display_command(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Invoke an external tool and capture its output
///
/// # Errors
/// * `BuildError::SpawnFailed` - If the tool couldn't be spawned
/// * `BuildError::Timeout` - If the tool exceeded the configured timeout
pub async fn invoke_tool(
    program: &str,
    args: &[String],
    options: &ToolOptions,
) -> Result<ToolOutcome, BuildError> {
    let start = Instant::now();
    let command_str = display_command(program, args);

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    if let Some(ref dir) = options.working_dir {
        cmd.current_dir(dir);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    tracing::debug!("Invoking: {}", command_str);

    let child = cmd.spawn().map_err(|e| BuildError::SpawnFailed {
        command: command_str.clone(),
        error: e.to_string(),
    })?;

    let waited = if let Some(limit) = options.timeout {
        match timeout(limit, wait_for_output(child, options.max_output_size)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(BuildError::Timeout {
                    command: command_str,
                    timeout_secs: limit.as_secs(),
                });
            }
        }
    } else {
        wait_for_output(child, options.max_output_size).await?
    };

    Ok(ToolOutcome {
        success: waited.exit_code == Some(0),
        exit_code: waited.exit_code,
        stdout: waited.stdout,
        stdout_truncated: waited.stdout_truncated,
        stderr: waited.stderr,
        stderr_truncated: waited.stderr_truncated,
        duration: start.elapsed(),
    })
}

/// Internal result from waiting for process output
struct WaitResult {
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
    stdout_truncated: bool,
    stderr_truncated: bool,
}

/// Wait for a child process and capture both output streams concurrently
async fn wait_for_output(
    mut child: tokio::process::Child,
    max_output_size: usize,
) -> Result<WaitResult, BuildError> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout_handle = tokio::spawn(async move {
        if let Some(stdout) = stdout {
            read_and_truncate(stdout, max_output_size).await
        } else {
            (String::new(), false)
        }
    });

    let stderr_handle = tokio::spawn(async move {
        if let Some(stderr) = stderr {
            read_and_truncate(stderr, max_output_size).await
        } else {
            (String::new(), false)
        }
    });

    let status = child.wait().await.map_err(BuildError::Io)?;

    let (stdout, stdout_truncated) = stdout_handle
        .await
        .map_err(|e| BuildError::Io(std::io::Error::other(format!("stdout task failed: {}", e))))?;

    let (stderr, stderr_truncated) = stderr_handle
        .await
        .map_err(|e| BuildError::Io(std::io::Error::other(format!("stderr task failed: {}", e))))?;

    Ok(WaitResult {
        exit_code: status.code(),
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
    })
}

/// Read from an async stream, capping the captured size
async fn read_and_truncate<R: tokio::io::AsyncRead + Unpin>(
    reader: R,
    max_size: usize,
) -> (String, bool) {
    let mut buf_reader = BufReader::new(reader);
    let mut output = String::with_capacity(max_size.min(64 * 1024));
    let mut line = String::with_capacity(4096);
    let mut truncated = false;

    loop {
        line.clear();
        match buf_reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if output.len() + line.len() > max_size {
                    let remaining = max_size.saturating_sub(output.len());
                    if remaining > 0 {
                        output.push_str(&line[..remaining.min(line.len())]);
                    }
                    output.push_str(TRUNCATION_MARKER);
                    truncated = true;
                    break;
                }
                output.push_str(&line);
            }
            Err(e) => {
                tracing::warn!("Error reading tool output: {}", e);
                break;
            }
        }
    }

    (output, truncated)
}
