//! pursbuild - PureScript Build Orchestrator
//!
//! Drives a PureScript project build by shelling out to the external
//! toolchain, with a configurable task table mapping names to ordered step
//! sequences:
//! - **compile** - per-module compilation (psc-make) into the output directory
//! - **bundle** - single-artifact compilation (psc) captured from stdout
//! - **validate** - syntax-check emitted JavaScript (node --check)
//! - **psci** - write the `.psci` REPL-loader file
//! - **docs** - render Markdown docs (psc-docs) per configured target
//! - **clean** - remove the output directory and generated files
//!
//! ## Features
//!
//! - Explicit task registry with fail-fast sequential execution
//! - XDG-compliant layered configuration
//! - Glob-based source discovery covering vendored dependencies
//! - Debounced file watching with coalesced re-runs

pub mod cli;
pub mod compiler;
pub mod config;
pub mod docgen;
pub mod error;
pub mod exec;
pub mod psci;
pub mod registry;
pub mod sources;
pub mod validate;
pub mod watch;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::BuildError;
pub use exec::{invoke_tool, ToolOptions, ToolOutcome};
pub use registry::{Registry, Step, StepReport, TaskReport, TaskRunner};
