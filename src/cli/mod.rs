//! CLI module for pursbuild
//!
//! Provides command-line interface with the following subcommands:
//! - `run` - Run a task against a project
//! - `list` - List registered tasks and their step sequences
//! - `watch` - Watch project sources and re-run a task on change

pub mod commands;

pub use commands::{Cli, Commands};
