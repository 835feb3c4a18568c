//! CLI command definitions using clap
//!
//! Defines all CLI subcommands and their arguments.

use clap::{Parser, Subcommand, ValueEnum};

/// PureScript build orchestrator.
///
/// Runs named task sequences (compile, validate, psci, docs) against a
/// project by shelling out to the PureScript toolchain, and can watch the
/// sources and re-run a task on change.
#[derive(Parser, Debug)]
#[command(name = "pursbuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (overrides default XDG paths)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a task (defaults to the 'default' task)
    Run(RunArgs),

    /// List registered tasks and their step sequences
    List(ListArgs),

    /// Watch project sources and re-run a task on change
    Watch(WatchArgs),
}

/// Arguments for the `run` subcommand
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Task name (defaults to 'default')
    pub task: Option<String>,

    /// Project root (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<String>,
}

/// Arguments for the `list` subcommand
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the `watch` subcommand
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Task name to re-run on change (defaults to 'default')
    pub task: Option<String>,

    /// Project root (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<String>,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON output
    Json,
    /// Plain text (names only)
    Plain,
}
