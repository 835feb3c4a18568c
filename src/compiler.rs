//! Compiler invocation adapter
//!
//! Wraps the external PureScript compiler. Two modes exist, selected by the
//! requested step: per-module compilation (`psc-make`, one output tree per
//! module under the output directory) and bundled compilation (`psc`, a
//! single combined artifact captured from stdout and written to the bundle
//! destination). A compiler error becomes a structured failure for the
//! current invocation; it never takes the host process down.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::BuildError;
use crate::exec::{display_command, invoke_tool, ToolOptions};
use crate::sources;

/// Compilation mode, selected by the requested task step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// One output file tree per source module, under the output directory
    Modules,
    /// A single bundled output artifact
    Bundle,
}

/// Invoke the external compiler over the configured source set.
///
/// In `Modules` mode the compiler writes the output directory itself; in
/// `Bundle` mode the bundle is captured from stdout and written to the
/// configured bundle destination, overwriting any previous artifact.
pub async fn compile(config: &Config, root: &Path, mode: CompileMode) -> Result<(), BuildError> {
    let files = sources::source_set(config, root)?;

    let program = match mode {
        CompileMode::Modules => &config.compiler.command,
        CompileMode::Bundle => &config.compiler.bundle_command,
    };

    let mut args: Vec<String> = Vec::new();
    if mode == CompileMode::Modules {
        args.push("--output".to_string());
        args.push(config.paths.output.clone());
    }
    if config.compiler.no_prelude {
        args.push("--no-prelude".to_string());
    }
    args.extend(config.compiler.options.iter().cloned());
    args.extend(files.iter().map(|f| f.to_string_lossy().into_owned()));

    let options = ToolOptions::in_dir(root).with_timeout_secs(config.compiler.timeout);
    let outcome = invoke_tool(program, &args, &options).await?;

    if !outcome.success {
        return Err(BuildError::CompilerFailed {
            command: display_command(program, &args),
            exit_code: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }

    if mode == CompileMode::Bundle {
        let dest = root.join(&config.paths.bundle);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, outcome.stdout)?;
        tracing::debug!("Wrote bundle to {}", dest.display());
    }

    tracing::debug!(
        "Compiled {} source file(s) in {}ms",
        files.len(),
        outcome.duration.as_millis()
    );

    Ok(())
}
