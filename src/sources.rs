//! Source file discovery
//!
//! Expands the configured glob groups (project sources, vendored dependency
//! sources) into the input set every task observes. Expansion preserves
//! filesystem traversal order and performs no deduplication or filtering, so
//! all tasks see the same consistent set.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::config::Config;
use crate::error::BuildError;

/// Expand all configured source globs relative to the project root.
///
/// Returned paths are relative to `root` when the pattern was relative.
/// Unreadable paths inside a matched tree are an error; a pattern matching
/// nothing is not.
pub fn source_set(config: &Config, root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    expand_patterns(&config.all_source_patterns(), root)
}

/// Expand only the project source globs (the set the watcher observes).
pub fn project_sources(config: &Config, root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let patterns: Vec<&str> = config.paths.sources.iter().map(|s| s.as_str()).collect();
    expand_patterns(&patterns, root)
}

fn expand_patterns(patterns: &[&str], root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();

    for pattern in patterns {
        let anchored = root.join(pattern);
        let anchored = anchored.to_string_lossy();

        for entry in glob::glob(&anchored)? {
            let path = entry?;
            // Report paths relative to the project root where possible
            let path = path.strip_prefix(root).map(Path::to_path_buf).unwrap_or(path);
            files.push(path);
        }
    }

    Ok(files)
}

/// Directories the watcher must observe to cover the project source globs.
///
/// Each glob contributes its longest literal prefix (the part before the
/// first wildcard component); the watcher recurses from there.
pub fn watch_roots(config: &Config, root: &Path) -> Vec<PathBuf> {
    let mut roots = Vec::new();

    for pattern in &config.paths.sources {
        let prefix = literal_prefix(pattern);
        let dir = if prefix.as_os_str().is_empty() {
            root.to_path_buf()
        } else {
            root.join(prefix)
        };
        if !roots.contains(&dir) {
            roots.push(dir);
        }
    }

    roots
}

/// The longest leading path made only of literal (wildcard-free) components
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();

    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        if text.contains('*') || text.contains('?') || text.contains('[') {
            break;
        }
        prefix.push(component);
    }

    prefix
}

/// Whether a changed path belongs to the watched source set
pub fn matches_sources(config: &Config, root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);

    config.paths.sources.iter().any(|pattern| {
        Pattern::new(pattern)
            .map(|p| p.matches_path(relative))
            .unwrap_or(false)
    })
}
