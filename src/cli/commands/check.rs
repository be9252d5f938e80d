//! Check command implementation.
//!
//! `vmbuild check` resolves the dependency list and reports each tool
//! without building anything.

use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::config::load_config;
use crate::error::{BuildError, Result};
use crate::requirements::{
    check_dependencies, system_resolver, DependencyReport, DependencyStatus, ToolResolver,
};
use crate::runner::REMEDIATION;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: CheckArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Run against an explicit resolver.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        resolver: &dyn ToolResolver,
    ) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        let report = check_dependencies(&config.dependencies, resolver);

        if self.args.json {
            ui.message(&report_json(&report)?);
        } else {
            show_report(ui, &report);
        }

        Ok(if report.ok() {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        let resolver = system_resolver(config.settings.resolver);
        self.execute_with(ui, resolver.as_ref())
    }
}

fn show_report(ui: &mut dyn UserInterface, report: &DependencyReport) {
    ui.show_header("Dependencies");

    let width = report
        .checks()
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);

    for check in report.checks() {
        match &check.status {
            DependencyStatus::Found(path) => ui.success(&format!(
                "{:width$}  {}",
                check.name,
                path.display(),
                width = width
            )),
            DependencyStatus::Missing => {
                ui.warning(&format!("{:width$}  missing", check.name, width = width))
            }
        }
    }

    if report.ok() {
        ui.success("All dependencies are satisfied.");
    } else {
        ui.error(&format!(
            "Missing dependencies: {}",
            report.missing().join(", ")
        ));
        ui.show_hint(REMEDIATION);
    }
}

fn report_json(report: &DependencyReport) -> Result<String> {
    let tools: Vec<serde_json::Value> = report
        .checks()
        .iter()
        .map(|c| match &c.status {
            DependencyStatus::Found(path) => serde_json::json!({
                "name": c.name,
                "found": true,
                "path": path.to_string_lossy(),
            }),
            DependencyStatus::Missing => serde_json::json!({
                "name": c.name,
                "found": false,
                "path": null,
            }),
        })
        .collect();

    let value = serde_json::json!({
        "ok": report.ok(),
        "missing": report.missing(),
        "dependencies": tools,
    });

    serde_json::to_string_pretty(&value).map_err(|e| BuildError::Other(e.into()))
}
