//! Common test utilities for pursbuild tests
//!
//! Builds throwaway project fixtures whose toolchain commands are shell
//! script stubs, so the full CLI can run without a PureScript installation.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Get a command instance for the pursbuild binary
pub fn pursbuild_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("pursbuild"))
}

/// Write an executable shell script stub into `dir` and return its path
#[cfg(unix)]
pub fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write stub");
    let mut perms = fs::metadata(&path)
        .expect("Failed to get metadata")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("Failed to set permissions");
    path
}

/// A per-module compiler stub: records its arguments to `psc-make.args`,
/// honors `--output`, and emits one file tree per `.purs` source it is given.
#[cfg(unix)]
pub const COMPILER_STUB: &str = r#"
echo "$@" > psc-make.args
out=output
prev=""
for a in "$@"; do
  if [ "$prev" = "--output" ]; then out="$a"; fi
  prev="$a"
done
for a in "$@"; do
  case "$a" in
    *.purs)
      name=$(basename "$a" .purs)
      mkdir -p "$out/$name"
      echo '"use strict";' > "$out/$name/index.js"
      ;;
  esac
done
"#;

/// Create a project fixture with one source module, stub toolchain scripts
/// under `bin/`, and a `.pursbuild.toml` pointing the tool commands at them.
#[cfg(unix)]
pub fn setup_project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");

    fs::create_dir_all(dir.path().join("src")).expect("Failed to create src");
    fs::write(
        dir.path().join("src/Main.purs"),
        "module Main where\n\nmain = unit\n",
    )
    .expect("Failed to write source");

    let bin = dir.path().join("bin");
    fs::create_dir_all(&bin).expect("Failed to create bin");

    let compiler = write_stub(&bin, "psc-make", COMPILER_STUB);
    let bundler = write_stub(&bin, "psc", "echo '\"use strict\"; /* bundle */'");
    let docgen = write_stub(&bin, "psc-docs", "echo '# Module Main'");
    let checker = write_stub(&bin, "node-check", "exit 0");

    write_project_config(dir.path(), &compiler, &bundler, &docgen, &checker);

    dir
}

/// Write the fixture's `.pursbuild.toml` wiring in the given stub commands
#[cfg(unix)]
pub fn write_project_config(
    root: &Path,
    compiler: &Path,
    bundler: &Path,
    docgen: &Path,
    checker: &Path,
) {
    let config = format!(
        r#"[compiler]
command = "{}"
bundle_command = "{}"

[validator]
command = "{}"
args = []

[docs.readme]
src = "src/**/*.purs"
dest = "README.md"
command = "{}"
"#,
        compiler.display(),
        bundler.display(),
        checker.display(),
        docgen.display()
    );

    fs::write(root.join(".pursbuild.toml"), config).expect("Failed to write config");
}
