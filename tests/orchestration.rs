//! End-to-end CLI tests for pursbuild
//!
//! Each test runs the real binary against a throwaway project whose
//! toolchain commands are shell script stubs, then asserts on the artifacts
//! left behind. Stubs are shell scripts, so the suite is unix-only.

#![cfg(unix)]

mod common;

use std::fs;

use common::{pursbuild_cmd, setup_project, write_stub};
use predicates::prelude::*;

// =============================================================================
// Run Tests
// =============================================================================

#[test]
fn test_make_produces_all_artifacts() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "make"])
        .assert()
        .success();

    assert!(dir.path().join("output/Main/index.js").is_file());
    let psci = fs::read_to_string(dir.path().join(".psci")).unwrap();
    assert!(psci.contains(":m src/Main.purs"));
    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert!(readme.contains("# Module Main"));
}

#[test]
fn test_default_task_runs_make() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .success();

    assert!(dir.path().join("output/Main/index.js").is_file());
    assert!(dir.path().join(".psci").is_file());
}

#[test]
fn test_compiler_receives_output_and_no_prelude() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "make"])
        .assert()
        .success();

    let args = fs::read_to_string(dir.path().join("psc-make.args")).unwrap();
    assert!(args.contains("--output output"));
    assert!(args.contains("--no-prelude"));
    assert!(args.contains("src/Main.purs"));
}

#[test]
fn test_browser_task_writes_bundle() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "browser"])
        .assert()
        .success();

    let bundle = fs::read_to_string(dir.path().join("psc.js")).unwrap();
    assert!(bundle.contains("use strict"));
    // Per-module output is not part of the bundled task
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_compiler_failure_fails_the_run() {
    let dir = setup_project();
    write_stub(
        &dir.path().join("bin"),
        "psc-make",
        "echo 'Cannot unify Unit with String' >&2; exit 1",
    );

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "make"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot unify"));

    // Fail-fast: later steps never ran
    assert!(!dir.path().join(".psci").exists());
    assert!(!dir.path().join("README.md").exists());
}

#[test]
fn test_validation_failure_fails_the_run() {
    let dir = setup_project();
    write_stub(
        &dir.path().join("bin"),
        "node-check",
        "echo 'SyntaxError: Unexpected token' >&2; exit 1",
    );

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "make"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SyntaxError"));

    // Compile completed before validation failed
    assert!(dir.path().join("output/Main/index.js").is_file());
    // Fail-fast: the REPL-loader step never ran
    assert!(!dir.path().join(".psci").exists());
}

#[test]
fn test_unknown_task_lists_available() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "deploy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deploy"))
        .stderr(predicate::str::contains("make"));
}

#[test]
fn test_docs_task_overwrites_stale_output() {
    let dir = setup_project();
    fs::write(dir.path().join("README.md"), "stale docs").unwrap();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "docs"])
        .assert()
        .success();

    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert!(readme.contains("# Module Main"));
    assert!(!readme.contains("stale"));
}

#[test]
fn test_dynamic_docs_task_by_target_name() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "docs-readme"])
        .assert()
        .success();

    assert!(dir.path().join("README.md").is_file());
}

// =============================================================================
// Clean Tests
// =============================================================================

#[test]
fn test_clean_removes_generated_artifacts() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "make"])
        .assert()
        .success();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "clean"])
        .assert()
        .success();

    assert!(!dir.path().join("output").exists());
    assert!(!dir.path().join(".psci").exists());
    // Sources stay untouched
    assert!(dir.path().join("src/Main.purs").is_file());
}

#[test]
fn test_clean_on_fresh_project_succeeds() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "clean"])
        .assert()
        .success();
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list_plain_names_tasks() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["list", "--format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("make"))
        .stdout(predicate::str::contains("browser"))
        .stdout(predicate::str::contains("default"))
        .stdout(predicate::str::contains("docs-readme"));
}

#[test]
fn test_list_json_is_parseable() {
    let dir = setup_project();

    let output = pursbuild_cmd()
        .current_dir(dir.path())
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let tasks = json["tasks"].as_array().unwrap();
    assert!(tasks
        .iter()
        .any(|t| t["name"] == "make" && t["steps"].as_array().unwrap().len() == 4));
}

#[test]
fn test_list_table_shows_sequences() {
    let dir = setup_project();

    pursbuild_cmd()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile, validate, psci, docs"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_explicit_config_flag() {
    let dir = setup_project();
    let moved = dir.path().join("custom.toml");
    fs::rename(dir.path().join(".pursbuild.toml"), &moved).unwrap();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "make", "-c"])
        .arg(&moved)
        .assert()
        .success();

    assert!(dir.path().join("output/Main/index.js").is_file());
}

#[test]
fn test_config_overrides_make_sequence() {
    let dir = setup_project();
    let config = fs::read_to_string(dir.path().join(".pursbuild.toml")).unwrap();
    fs::write(
        dir.path().join(".pursbuild.toml"),
        format!("{}\n[tasks]\nmake = [\"compile\", \"psci\"]\n", config),
    )
    .unwrap();

    pursbuild_cmd()
        .current_dir(dir.path())
        .args(["run", "make"])
        .assert()
        .success();

    assert!(dir.path().join(".psci").is_file());
    // The docs step is gone from the overridden sequence
    assert!(!dir.path().join("README.md").exists());
}
