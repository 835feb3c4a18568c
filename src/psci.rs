//! REPL-loader file generation
//!
//! Writes a `.psci` file at the project root containing one `:m <path>`
//! directive per source file, so an interactive session loads the whole
//! project. Overwritten on every run.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::BuildError;
use crate::sources;

/// Generate the REPL-loader file from the configured source set.
///
/// Returns the number of module directives written.
pub fn generate(config: &Config, root: &Path) -> Result<usize, BuildError> {
    let files = sources::source_set(config, root)?;

    let mut contents = String::new();
    for file in &files {
        contents.push_str(":m ");
        contents.push_str(&file.to_string_lossy());
        contents.push('\n');
    }

    let dest = root.join(&config.paths.psci);
    fs::write(&dest, contents)?;

    tracing::debug!(
        "Wrote {} module directive(s) to {}",
        files.len(),
        dest.display()
    );

    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_with_sources(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "module X where\n").unwrap();
        }
        dir
    }

    #[test]
    fn test_generate_writes_one_directive_per_source() {
        let dir = project_with_sources(&["src/A.purs", "src/Data/B.purs"]);
        let config = Config::default();

        let count = generate(&config, dir.path()).unwrap();
        assert_eq!(count, 2);

        let contents = fs::read_to_string(dir.path().join(".psci")).unwrap();
        assert!(contents.contains(":m src/A.purs"));
        assert!(contents.contains(":m src/Data/B.purs"));
    }

    #[test]
    fn test_generate_overwrites_previous_file() {
        let dir = project_with_sources(&["src/A.purs"]);
        fs::write(dir.path().join(".psci"), ":m stale/Old.purs\n").unwrap();
        let config = Config::default();

        generate(&config, dir.path()).unwrap();

        let contents = fs::read_to_string(dir.path().join(".psci")).unwrap();
        assert!(!contents.contains("stale"));
        assert!(contents.contains(":m src/A.purs"));
    }

    #[test]
    fn test_generate_empty_source_set() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();

        let count = generate(&config, dir.path()).unwrap();
        assert_eq!(count, 0);
        assert_eq!(fs::read_to_string(dir.path().join(".psci")).unwrap(), "");
    }

    #[test]
    fn test_generate_includes_vendored_sources() {
        let dir = project_with_sources(&[
            "src/A.purs",
            "bower_components/purescript-maybe/src/Data/Maybe.purs",
        ]);
        let config = Config::default();

        generate(&config, dir.path()).unwrap();

        let contents = fs::read_to_string(dir.path().join(".psci")).unwrap();
        assert!(contents.contains("purescript-maybe"));
    }
}
