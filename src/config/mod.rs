//! Configuration module for pursbuild
//!
//! Provides XDG-compliant layered configuration loading for the path set,
//! external tool commands, doc targets, and the task table.

pub mod loader;
pub mod model;

pub use loader::{config_paths, load_config};
pub use model::*;
