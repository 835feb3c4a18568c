//! File watching and automatic re-runs
//!
//! Watches the project source globs and re-runs one task when they change.
//! Changes are debounced into batches, and batches arriving while a run is
//! in progress coalesce into at most one follow-up run, so a burst of saves
//! never queues a backlog of builds. A failing run is reported and the
//! watcher keeps going.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEvent};

use crate::config::Config;
use crate::error::BuildError;
use crate::registry::TaskRunner;
use crate::sources;

/// Watch the project sources and re-run `task` on every relevant change.
///
/// Runs the task once up front, then blocks on the event loop until the
/// watcher channel closes. Intended to be driven from a blocking thread.
pub fn watch_task(config: &Config, root: &Path, task: &str) -> Result<(), BuildError> {
    let runner = TaskRunner::new(config, root);
    // An unknown task should fail before the watcher starts
    runner.registry().resolve(task)?;

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(config.watch.debounce_ms), tx)?;

    for dir in sources::watch_roots(config, root) {
        if dir.is_dir() {
            debouncer.watcher().watch(&dir, RecursiveMode::Recursive)?;
            tracing::info!("Watching {}", dir.display());
        } else {
            tracing::warn!("Watch root {} does not exist, skipping", dir.display());
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    run_once(&runtime, &runner, task);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                if !any_relevant(&events, config, root) {
                    continue;
                }

                tracing::info!("Detected {} change(s), re-running '{}'", events.len(), task);
                run_once(&runtime, &runner, task);

                // Changes that landed mid-run coalesce into one follow-up
                if drain_pending(&rx, config, root) {
                    tracing::info!("Changes during run, re-running '{}' once more", task);
                    run_once(&runtime, &runner, task);
                }
            }
            Ok(Err(error)) => {
                tracing::warn!("Watch error: {}", error);
            }
            Err(_) => break,
        }
    }

    Ok(())
}

fn run_once(runtime: &tokio::runtime::Runtime, runner: &TaskRunner<'_>, task: &str) {
    match runtime.block_on(runner.run_task(task)) {
        Ok(report) => {
            let total: u64 = report.steps.iter().map(|s| s.duration_ms).sum();
            tracing::info!("Task '{}' finished in {}ms", report.task, total);
        }
        Err(error) => {
            tracing::error!("Task '{}' failed: {}", task, error);
        }
    }
}

/// Whether any event in a batch touches the watched source set
fn any_relevant(events: &[DebouncedEvent], config: &Config, root: &Path) -> bool {
    events
        .iter()
        .any(|event| sources::matches_sources(config, root, &event.path))
}

/// Drain every batch queued during a run; true if any touched the source set
fn drain_pending(rx: &Receiver<DebounceEventResult>, config: &Config, root: &Path) -> bool {
    let mut relevant = false;

    loop {
        match rx.try_recv() {
            Ok(Ok(events)) => {
                if any_relevant(&events, config, root) {
                    relevant = true;
                }
            }
            Ok(Err(error)) => {
                tracing::warn!("Watch error: {}", error);
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }

    relevant
}
