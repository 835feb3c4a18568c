//! Post-compile output validation
//!
//! Runs an external syntax checker (node --check by default) over the
//! emitted JavaScript. Scope is a policy knob carried over from the two
//! original build configurations: either every file under the output
//! directory, or only one named module's output files. The first invalid
//! file fails the build; there is no semantic checking.

use std::path::{Path, PathBuf};

use crate::config::{Config, ValidationScope};
use crate::error::BuildError;
use crate::exec::{invoke_tool, ToolOptions};

/// Validate emitted output files under the configured scope.
///
/// Returns the number of files checked. A missing output directory yields
/// zero checked files rather than an error, matching a compile that emitted
/// nothing.
pub async fn validate(config: &Config, root: &Path) -> Result<usize, BuildError> {
    let scope = config.validator.resolved_scope()?;
    let files = output_files(config, root, &scope)?;

    let options = ToolOptions::in_dir(root).with_timeout_secs(config.compiler.timeout);

    for file in &files {
        let mut args = config.validator.args.clone();
        args.push(file.to_string_lossy().into_owned());

        let outcome = invoke_tool(&config.validator.command, &args, &options).await?;

        if !outcome.success {
            let message = if outcome.stderr.trim().is_empty() {
                outcome.stdout.trim().to_string()
            } else {
                outcome.stderr.trim().to_string()
            };
            return Err(BuildError::ValidationFailed {
                file: file.display().to_string(),
                message,
            });
        }
    }

    tracing::debug!("Validated {} output file(s)", files.len());

    Ok(files.len())
}

/// Collect the emitted files covered by a validation scope
fn output_files(
    config: &Config,
    root: &Path,
    scope: &ValidationScope,
) -> Result<Vec<PathBuf>, BuildError> {
    let pattern = match scope {
        ValidationScope::All => root.join(&config.paths.output).join("**/*.js"),
        ValidationScope::Module(name) => root
            .join(&config.paths.output)
            .join(name)
            .join("**/*.js"),
    };

    let mut files = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry?;
        let path = path.strip_prefix(root).map(Path::to_path_buf).unwrap_or(path);
        files.push(path);
    }

    Ok(files)
}
