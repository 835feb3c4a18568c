//! pursbuild CLI entry point
//!
//! Usage:
//!   pursbuild run [TASK]     Run a task (defaults to 'default')
//!   pursbuild list           List registered tasks
//!   pursbuild watch [TASK]   Watch sources and re-run a task on change

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use pursbuild::cli::{
    commands::{ListArgs, OutputFormat, RunArgs, WatchArgs},
    Cli, Commands,
};
use pursbuild::config::load_config;
use pursbuild::error::{suggest_fix, BuildError};
use pursbuild::registry::{Registry, TaskRunner};
use pursbuild::watch::watch_task;

const DEFAULT_TASK: &str = "default";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            if let Some(hint) = hint_for(&e) {
                eprintln!("{}: {}", "hint".yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// Actionable hint for common external-tool failures
fn hint_for(error: &anyhow::Error) -> Option<String> {
    match error.downcast_ref::<BuildError>()? {
        BuildError::SpawnFailed { command, error } => suggest_fix(command, error),
        BuildError::CompilerFailed {
            command, stderr, ..
        } => suggest_fix(command, stderr),
        BuildError::DocsFailed {
            command, stderr, ..
        } => suggest_fix(command, stderr),
        _ => None,
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "pursbuild=debug"
    } else {
        "pursbuild=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => {
            run_build_task(args, cli.config.as_deref(), cli.verbose).await?;
        }
        Commands::List(args) => {
            list_tasks(args, cli.config.as_deref())?;
        }
        Commands::Watch(args) => {
            watch_build_task(args, cli.config.as_deref()).await?;
        }
    }

    Ok(())
}

/// Run one task to completion
async fn run_build_task(args: RunArgs, config_path: Option<&str>, verbose: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let root = resolve_project_root(args.project.as_deref())?;
    let task = args.task.as_deref().unwrap_or(DEFAULT_TASK);

    let runner = TaskRunner::new(&config, &root);
    let report = runner.run_task(task).await?;

    if verbose {
        for step in &report.steps {
            eprintln!("{}: {} ({}ms)", "step".cyan(), step.step, step.duration_ms);
        }
    }

    let total: u64 = report.steps.iter().map(|s| s.duration_ms).sum();
    eprintln!(
        "{}: {} ({} step(s) in {}ms)",
        "success".green(),
        report.task,
        report.steps.len(),
        total
    );

    Ok(())
}

/// List registered tasks and their resolved step sequences
fn list_tasks(args: ListArgs, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = Registry::from_config(&config);
    let names = registry.task_names();

    match args.format {
        OutputFormat::Json => {
            let mut tasks = Vec::new();
            for name in &names {
                let steps: Vec<String> = registry
                    .resolve(name)
                    .with_context(|| format!("Failed to resolve task '{}'", name))?
                    .iter()
                    .map(|s| s.label())
                    .collect();
                tasks.push(serde_json::json!({ "name": name, "steps": steps }));
            }
            let json = serde_json::to_string_pretty(&serde_json::json!({ "tasks": tasks }))?;
            println!("{}", json);
        }
        OutputFormat::Plain => {
            for name in &names {
                println!("{}", name);
            }
        }
        OutputFormat::Table => {
            if names.is_empty() {
                println!("No tasks registered.");
                return Ok(());
            }

            let max_name_width = names.iter().map(|n| n.len()).max().unwrap_or(10);
            for name in &names {
                let steps: Vec<String> = registry
                    .resolve(name)
                    .with_context(|| format!("Failed to resolve task '{}'", name))?
                    .iter()
                    .map(|s| s.label())
                    .collect();
                println!(
                    "  {:width$}  {}",
                    name.green(),
                    steps.join(", "),
                    width = max_name_width
                );
            }
        }
    }

    Ok(())
}

/// Watch sources and re-run a task on change
async fn watch_build_task(args: WatchArgs, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let root = resolve_project_root(args.project.as_deref())?;
    let task = args
        .task
        .as_deref()
        .unwrap_or(DEFAULT_TASK)
        .to_string();

    // The watch loop blocks on a channel, so it lives on a blocking thread
    tokio::task::spawn_blocking(move || watch_task(&config, &root, &task))
        .await
        .context("Watch thread panicked")??;

    Ok(())
}

/// Resolve the project root from an optional path argument
fn resolve_project_root(project: Option<&str>) -> Result<PathBuf> {
    match project {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_dir() {
                Ok(path)
            } else {
                anyhow::bail!("Project directory '{}' not found", p)
            }
        }
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}
