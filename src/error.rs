//! Error types for pursbuild
//!
//! Covers the whole build taxonomy: compiler, validator, doc generation,
//! task resolution, subprocess, and filesystem failures. All errors are
//! fail-fast at the task-sequence level; none are retried.

use thiserror::Error;

/// Main error type for build operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// Requested task not found in the registry
    #[error("Task '{task}' not found (available: {})", .available.join(", "))]
    TaskNotFound {
        task: String,
        available: Vec<String>,
    },

    /// A task sequence entry is neither a built-in step nor a known task
    #[error("Unknown step '{step}' in task '{task}'")]
    UnknownStep { step: String, task: String },

    /// Task sequences reference each other in a cycle
    #[error("Task cycle detected: {chain}")]
    TaskCycle { chain: String },

    /// The external compiler reported a failure
    #[error("Compiler failed: {command}\n{stderr}")]
    CompilerFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// An emitted output file failed the syntax check
    #[error("Validation failed for {file}: {message}")]
    ValidationFailed { file: String, message: String },

    /// Doc generation failed for a target
    #[error("Doc generation failed for target '{target}':\n{stderr}")]
    DocsFailed {
        target: String,
        command: String,
        stderr: String,
    },

    /// Requested doc target is not configured
    #[error("Doc target '{target}' not found (available: {})", .available.join(", "))]
    DocsTargetNotFound {
        target: String,
        available: Vec<String>,
    },

    /// Failed to spawn an external tool
    #[error("Failed to spawn command: {command}")]
    SpawnFailed { command: String, error: String },

    /// External tool exceeded the configured timeout
    #[error("Command timed out after {timeout_secs}s: {command}")]
    Timeout { command: String, timeout_secs: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid glob pattern in the path configuration
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Glob expansion hit an unreadable path
    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// Filesystem watcher error
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Suggest fixes for common external-tool failures.
///
/// A failed spawn surfaces the OS text "No such file or directory (os error
/// 2)", so that form means a missing binary, not a missing input file.
pub fn suggest_fix(command: &str, stderr: &str) -> Option<String> {
    let missing_binary = stderr.contains("command not found")
        || stderr.contains("not found")
        || stderr.contains("os error 2");

    if missing_binary {
        if command.contains("psc-make") || command.contains("psc-docs") {
            return Some(
                "PureScript toolchain not found. Install it and make sure psc-make/psc-docs are on PATH."
                    .to_string(),
            );
        }
        if command.contains("psc") {
            return Some("'psc' command not found. Install the PureScript compiler.".to_string());
        }
        if command.contains("node") {
            return Some(
                "'node' command not found. Install Node.js for output validation.".to_string(),
            );
        }
        return Some("Required command not found. Check PATH and dependencies.".to_string());
    }

    if stderr.contains("Permission denied") {
        return Some(
            "Permission denied. Check file permissions or run with appropriate access.".to_string(),
        );
    }

    if stderr.contains("No such file") {
        return Some("File not found. Check the source globs and the project root.".to_string());
    }

    None
}
