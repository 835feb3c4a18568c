//! Documentation generation
//!
//! Runs the external doc extractor (psc-docs by default) over each
//! configured target's source glob and overwrites the target's destination
//! file with the rendered output. Targets are independent units of work;
//! the `docs` step regenerates every configured target unconditionally.

use std::fs;
use std::path::Path;

use crate::config::{Config, DocTarget};
use crate::error::BuildError;
use crate::exec::{invoke_tool, ToolOptions};

/// Regenerate all configured doc targets, in sorted name order.
pub async fn generate_all(config: &Config, root: &Path) -> Result<(), BuildError> {
    for name in config.doc_target_names() {
        generate_target(config, root, &name).await?;
    }
    Ok(())
}

/// Regenerate a single doc target by name.
pub async fn generate_target(config: &Config, root: &Path, name: &str) -> Result<(), BuildError> {
    let target = config
        .docs
        .get(name)
        .ok_or_else(|| BuildError::DocsTargetNotFound {
            target: name.to_string(),
            available: config.doc_target_names(),
        })?;

    render(config, root, name, target).await
}

async fn render(
    config: &Config,
    root: &Path,
    name: &str,
    target: &DocTarget,
) -> Result<(), BuildError> {
    let mut files = Vec::new();
    for entry in glob::glob(&root.join(&target.src).to_string_lossy())? {
        let path = entry?;
        let path = path.strip_prefix(root).map(Path::to_path_buf).unwrap_or(path);
        files.push(path.to_string_lossy().into_owned());
    }

    let options = ToolOptions::in_dir(root).with_timeout_secs(config.compiler.timeout);
    let outcome = invoke_tool(&target.command, &files, &options).await?;

    if !outcome.success {
        return Err(BuildError::DocsFailed {
            target: name.to_string(),
            command: target.command.clone(),
            stderr: outcome.stderr,
        });
    }

    let dest = root.join(&target.dest);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, outcome.stdout)?;

    tracing::debug!("Rendered doc target '{}' to {}", name, dest.display());

    Ok(())
}
