//! Task registry and sequential execution
//!
//! The registry maps task names to ordered step sequences, replacing the
//! original by-convention plugin lookup with an explicit table. A sequence
//! entry is either a built-in step, a reference to another task (expanded
//! recursively, with cycle detection), or a dynamic `docs-<target>` name.
//! Execution is strictly sequential and fail-fast: the first failing step
//! aborts the remainder, and partial outputs from completed steps stay on
//! disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::compiler::{self, CompileMode};
use crate::config::Config;
use crate::docgen;
use crate::error::BuildError;
use crate::psci;
use crate::validate;

/// A built-in build step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Remove the output directory and generated files
    Clean,
    /// Per-module compilation into the output directory
    Compile,
    /// Bundled compilation into a single artifact
    Bundle,
    /// Syntax-check emitted output files
    Validate,
    /// Write the REPL-loader file
    Psci,
    /// Regenerate all doc targets
    Docs,
    /// Regenerate one named doc target
    DocsTarget(String),
}

impl Step {
    /// Parse a sequence entry as a built-in step, if it is one
    pub fn parse(name: &str) -> Option<Step> {
        match name {
            "clean" => Some(Step::Clean),
            "compile" => Some(Step::Compile),
            "bundle" => Some(Step::Bundle),
            "validate" => Some(Step::Validate),
            "psci" => Some(Step::Psci),
            "docs" => Some(Step::Docs),
            _ => name.strip_prefix("docs:").map(|t| Step::DocsTarget(t.to_string())),
        }
    }

    /// Display label for reports and logs
    pub fn label(&self) -> String {
        match self {
            Step::Clean => "clean".to_string(),
            Step::Compile => "compile".to_string(),
            Step::Bundle => "bundle".to_string(),
            Step::Validate => "validate".to_string(),
            Step::Psci => "psci".to_string(),
            Step::Docs => "docs".to_string(),
            Step::DocsTarget(t) => format!("docs:{}", t),
        }
    }
}

/// Task registry built from the configured task table
pub struct Registry {
    tasks: HashMap<String, Vec<String>>,
    doc_targets: Vec<String>,
}

impl Registry {
    /// Build the registry from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            tasks: config.tasks.clone(),
            doc_targets: config.doc_target_names(),
        }
    }

    /// Registered task names, sorted, including dynamic `docs-<target>` names
    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.keys().cloned().collect();
        for target in &self.doc_targets {
            let dynamic = format!("docs-{}", target);
            if !self.tasks.contains_key(&dynamic) {
                names.push(dynamic);
            }
        }
        names.sort();
        names
    }

    /// The declared (unexpanded) sequence for a task, if it is a table entry
    pub fn sequence(&self, task: &str) -> Option<&[String]> {
        self.tasks.get(task).map(|s| s.as_slice())
    }

    /// Resolve a task name into its flat, ordered step sequence.
    ///
    /// Sequence entries naming other tasks are expanded in place; a task may
    /// not reach itself through any chain of references.
    pub fn resolve(&self, task: &str) -> Result<Vec<Step>, BuildError> {
        if let Some(target) = self.dynamic_docs_target(task) {
            return Ok(vec![Step::DocsTarget(target)]);
        }

        if !self.tasks.contains_key(task) {
            return Err(BuildError::TaskNotFound {
                task: task.to_string(),
                available: self.task_names(),
            });
        }

        let mut steps = Vec::new();
        let mut visiting = Vec::new();
        self.expand(task, &mut visiting, &mut steps)?;
        Ok(steps)
    }

    fn expand(
        &self,
        task: &str,
        visiting: &mut Vec<String>,
        steps: &mut Vec<Step>,
    ) -> Result<(), BuildError> {
        if visiting.iter().any(|t| t == task) {
            let mut chain = visiting.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(task);
            return Err(BuildError::TaskCycle { chain });
        }
        visiting.push(task.to_string());

        let sequence = self.tasks.get(task).cloned().unwrap_or_default();
        for entry in &sequence {
            if let Some(step) = Step::parse(entry) {
                steps.push(step);
            } else if self.tasks.contains_key(entry) {
                self.expand(entry, visiting, steps)?;
            } else if let Some(target) = self.dynamic_docs_target(entry) {
                steps.push(Step::DocsTarget(target));
            } else {
                return Err(BuildError::UnknownStep {
                    step: entry.clone(),
                    task: task.to_string(),
                });
            }
        }

        visiting.pop();
        Ok(())
    }

    /// `docs-<target>` resolves dynamically for any configured doc target
    fn dynamic_docs_target(&self, name: &str) -> Option<String> {
        let target = name.strip_prefix("docs-")?;
        self.doc_targets
            .iter()
            .find(|t| t.as_str() == target)
            .cloned()
    }
}

/// Outcome of one executed step
#[derive(Debug, Serialize)]
pub struct StepReport {
    /// Step label
    pub step: String,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Outcome of a completed task run
#[derive(Debug, Serialize)]
pub struct TaskReport {
    /// Task name as requested
    pub task: String,
    /// Per-step outcomes, in execution order
    pub steps: Vec<StepReport>,
}

/// Executes resolved task sequences against a project root
pub struct TaskRunner<'a> {
    config: &'a Config,
    registry: Registry,
    root: PathBuf,
}

impl<'a> TaskRunner<'a> {
    /// Create a runner for a project root
    pub fn new(config: &'a Config, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            registry: Registry::from_config(config),
            root: root.into(),
        }
    }

    /// The runner's registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run a task to completion, fail-fast.
    pub async fn run_task(&self, task: &str) -> Result<TaskReport, BuildError> {
        let steps = self.registry.resolve(task)?;
        let mut reports = Vec::with_capacity(steps.len());

        for step in steps {
            let start = Instant::now();
            tracing::debug!("Running step '{}'", step.label());

            self.run_step(&step).await?;

            reports.push(StepReport {
                step: step.label(),
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        Ok(TaskReport {
            task: task.to_string(),
            steps: reports,
        })
    }

    async fn run_step(&self, step: &Step) -> Result<(), BuildError> {
        match step {
            Step::Clean => clean_outputs(self.config, &self.root),
            Step::Compile => compiler::compile(self.config, &self.root, CompileMode::Modules).await,
            Step::Bundle => compiler::compile(self.config, &self.root, CompileMode::Bundle).await,
            Step::Validate => validate::validate(self.config, &self.root).await.map(|_| ()),
            Step::Psci => psci::generate(self.config, &self.root).map(|_| ()),
            Step::Docs => docgen::generate_all(self.config, &self.root).await,
            Step::DocsTarget(target) => {
                docgen::generate_target(self.config, &self.root, target).await
            }
        }
    }
}

/// Remove the output directory and generated files; sources stay untouched.
/// Missing paths are a no-op.
fn clean_outputs(config: &Config, root: &Path) -> Result<(), BuildError> {
    let output = root.join(&config.paths.output);
    if output.exists() {
        fs::remove_dir_all(&output)?;
        tracing::debug!("Removed {}", output.display());
    }

    for generated in [&config.paths.bundle, &config.paths.psci] {
        let path = root.join(generated);
        if path.exists() {
            fs::remove_file(&path)?;
        }
    }

    Ok(())
}
