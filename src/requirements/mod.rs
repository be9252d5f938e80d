//! Dependency detection.
//!
//! This module decides whether the external tools a build relies on are
//! installed and reachable.
//!
//! # Modules
//!
//! - [`probe`] - Resolvers that locate a tool by name
//! - [`status`] - Per-tool status and the ordered report
//! - [`checker`] - Runs a resolver over a dependency list

pub mod checker;
pub mod probe;
pub mod status;

pub use checker::{check_dependencies, system_resolver};
pub use probe::{PathResolver, ShellProbeResolver, ToolResolver};
pub use status::{DependencyCheck, DependencyReport, DependencyStatus};
