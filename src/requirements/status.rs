//! Dependency status types.
//!
//! Each checked tool produces a [`DependencyStatus`]; a run over the whole
//! list produces a [`DependencyReport`] that keeps the input order.

use std::path::PathBuf;

/// The result of resolving a single tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    /// Tool resolved to this location.
    Found(PathBuf),
    /// Tool is not resolvable on this host.
    Missing,
}

impl DependencyStatus {
    pub fn is_found(&self) -> bool {
        matches!(self, DependencyStatus::Found(_))
    }
}

/// One checked tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCheck {
    /// Tool name as listed in config.
    pub name: String,
    /// What the resolver found.
    pub status: DependencyStatus,
}

/// Outcome of checking a dependency list, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    checks: Vec<DependencyCheck>,
}

impl DependencyReport {
    pub fn new(checks: Vec<DependencyCheck>) -> Self {
        Self { checks }
    }

    /// Every checked tool, in input order.
    pub fn checks(&self) -> &[DependencyCheck] {
        &self.checks
    }

    /// True when no tool is missing.
    pub fn ok(&self) -> bool {
        self.checks.iter().all(|c| c.status.is_found())
    }

    /// Names of unresolved tools, in input order.
    pub fn missing(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|c| !c.status.is_found())
            .map(|c| c.name.clone())
            .collect()
    }
}
