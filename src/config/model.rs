//! Configuration model for pursbuild
//!
//! Everything the original build declared inline lives here as data: the
//! source glob groups, the external tool commands, the doc targets, and the
//! task table mapping task names to ordered step sequences. Loaded once at
//! process start and never mutated during a run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::BuildError;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Source globs and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// External compiler invocation settings
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Post-compile syntax validation settings
    #[serde(default)]
    pub validator: ValidatorConfig,

    /// Doc targets: name -> source glob + destination file
    #[serde(default = "default_docs")]
    pub docs: HashMap<String, DocTarget>,

    /// Task table: name -> ordered step sequence
    #[serde(default = "default_tasks")]
    pub tasks: HashMap<String, Vec<String>>,

    /// Watch trigger settings
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Source globs and output locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Project source globs
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    /// Vendored dependency source globs
    #[serde(default = "default_dependencies")]
    pub dependencies: Vec<String>,

    /// Output directory for per-module compilation
    #[serde(default = "default_output")]
    pub output: String,

    /// REPL-loader file written at the project root
    #[serde(default = "default_psci")]
    pub psci: String,

    /// Bundled-mode output file, relative to the project root
    #[serde(default = "default_bundle")]
    pub bundle: String,
}

fn default_sources() -> Vec<String> {
    vec!["src/**/*.purs".to_string()]
}

fn default_dependencies() -> Vec<String> {
    vec![
        "bower_components/purescript-*/src/**/*.purs".to_string(),
        "bower_components/purescript-*/src/**/*.purs.hs".to_string(),
    ]
}

fn default_output() -> String {
    "output".to_string()
}

fn default_psci() -> String {
    ".psci".to_string()
}

fn default_bundle() -> String {
    "psc.js".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            dependencies: default_dependencies(),
            output: default_output(),
            psci: default_psci(),
            bundle: default_bundle(),
        }
    }
}

/// External compiler invocation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompilerConfig {
    /// Per-module compiler command (one output tree per module)
    #[serde(default = "default_compile_command")]
    pub command: String,

    /// Bundled-mode compiler command (single combined artifact on stdout)
    #[serde(default = "default_bundle_command")]
    pub bundle_command: String,

    /// Exclude the implicit standard-library prelude from the compiled set
    #[serde(default = "default_no_prelude")]
    pub no_prelude: bool,

    /// Extra options forwarded verbatim to the compiler
    #[serde(default)]
    pub options: Vec<String>,

    /// Timeout in seconds for tool invocations (0 = no timeout)
    #[serde(default)]
    pub timeout: u64,
}

fn default_compile_command() -> String {
    "psc-make".to_string()
}

fn default_bundle_command() -> String {
    "psc".to_string()
}

fn default_no_prelude() -> bool {
    true
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: default_compile_command(),
            bundle_command: default_bundle_command(),
            no_prelude: default_no_prelude(),
            options: vec![],
            timeout: 0,
        }
    }
}

/// Post-compile syntax validation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidatorConfig {
    /// Syntax checker command
    #[serde(default = "default_validator_command")]
    pub command: String,

    /// Arguments passed before the file being checked
    #[serde(default = "default_validator_args")]
    pub args: Vec<String>,

    /// Validation scope: "all" or "module"
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Module name for scope = "module"
    pub module: Option<String>,
}

fn default_validator_command() -> String {
    "node".to_string()
}

fn default_validator_args() -> Vec<String> {
    vec!["--check".to_string()]
}

fn default_scope() -> String {
    "all".to_string()
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            command: default_validator_command(),
            args: default_validator_args(),
            scope: default_scope(),
            module: None,
        }
    }
}

/// Resolved validation scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationScope {
    /// Every emitted file under the output directory
    All,
    /// Only the named module's output files
    Module(String),
}

impl ValidatorConfig {
    /// Resolve the configured scope, rejecting inconsistent settings
    pub fn resolved_scope(&self) -> Result<ValidationScope, BuildError> {
        match self.scope.as_str() {
            "all" => Ok(ValidationScope::All),
            "module" => match &self.module {
                Some(name) => Ok(ValidationScope::Module(name.clone())),
                None => Err(BuildError::Config(
                    "validator.scope = \"module\" requires validator.module".to_string(),
                )),
            },
            other => Err(BuildError::Config(format!(
                "unknown validator.scope '{}': expected \"all\" or \"module\"",
                other
            ))),
        }
    }
}

/// A documentation target: extract docs from a source glob into one file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DocTarget {
    /// Source glob for the target
    pub src: String,

    /// Destination file, overwritten on every run
    pub dest: String,

    /// Doc extraction command (defaults to psc-docs)
    #[serde(default = "default_docgen_command")]
    pub command: String,
}

fn default_docgen_command() -> String {
    "psc-docs".to_string()
}

fn default_docs() -> HashMap<String, DocTarget> {
    let mut docs = HashMap::new();
    docs.insert(
        "readme".to_string(),
        DocTarget {
            src: "src/**/*.purs".to_string(),
            dest: "README.md".to_string(),
            command: default_docgen_command(),
        },
    );
    docs
}

fn default_tasks() -> HashMap<String, Vec<String>> {
    let mut tasks = HashMap::new();
    tasks.insert(
        "make".to_string(),
        vec![
            "compile".to_string(),
            "validate".to_string(),
            "psci".to_string(),
            "docs".to_string(),
        ],
    );
    tasks.insert("browser".to_string(), vec!["bundle".to_string()]);
    tasks.insert("docs".to_string(), vec!["docs".to_string()]);
    tasks.insert("clean".to_string(), vec!["clean".to_string()]);
    tasks.insert("default".to_string(), vec!["make".to_string()]);
    tasks
}

/// Watch trigger settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    /// Debounce window in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            compiler: CompilerConfig::default(),
            validator: ValidatorConfig::default(),
            docs: default_docs(),
            tasks: default_tasks(),
            watch: WatchConfig::default(),
        }
    }
}

impl Config {
    /// All source globs, project sources first, in declaration order
    pub fn all_source_patterns(&self) -> Vec<&str> {
        self.paths
            .sources
            .iter()
            .chain(self.paths.dependencies.iter())
            .map(|s| s.as_str())
            .collect()
    }

    /// Task names in the registry, sorted for stable output
    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Doc target names, sorted for stable output
    pub fn doc_target_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.docs.keys().cloned().collect();
        names.sort();
        names
    }
}
