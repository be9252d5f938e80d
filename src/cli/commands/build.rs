//! Build command implementation.
//!
//! `vmbuild build` (and bare `vmbuild`) checks dependencies and runs the
//! configured build.

use std::path::{Path, PathBuf};

use crate::cli::args::BuildArgs;
use crate::config::{load_config, validate, BuildConfig};
use crate::error::Result;
use crate::requirements::{system_resolver, ToolResolver};
use crate::runner::{BuildOutcome, BuildPipeline, BuildPlan};
use crate::shell::{ProcessRunner, SystemRunner};
use crate::ui::{OutputMode, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The build command implementation.
pub struct BuildCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: BuildArgs,
}

impl BuildCommand {
    /// Create a new build command.
    pub fn new(project_root: &Path, config_path: Option<&Path>, args: BuildArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    fn load(&self, ui: &mut dyn UserInterface) -> Result<BuildConfig> {
        let mut config = load_config(&self.project_root, self.config_path.as_deref())?;
        if let Some(dir) = &self.args.output_dir {
            config.output_dir = dir.clone();
            validate(&config)?;
        }

        // Config output mode applies only when no CLI flag changed it
        if ui.output_mode() == OutputMode::Normal {
            ui.set_output_mode(config.settings.output.into());
        }

        Ok(config)
    }

    /// Run against explicit collaborators.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        resolver: &dyn ToolResolver,
        runner: &dyn ProcessRunner,
    ) -> Result<CommandResult> {
        let config = self.load(ui)?;
        self.run(&config, ui, resolver, runner)
    }

    fn run(
        &self,
        config: &BuildConfig,
        ui: &mut dyn UserInterface,
        resolver: &dyn ToolResolver,
        runner: &dyn ProcessRunner,
    ) -> Result<CommandResult> {
        let plan = BuildPlan::from_config(config, &self.project_root)?;

        let outcome = BuildPipeline::new(&plan, resolver, runner)
            .dry_run(self.args.dry_run)
            .run(ui)?;

        Ok(match outcome {
            BuildOutcome::Aborted { .. } => CommandResult::failure(1),
            BuildOutcome::Finished(report)
                if !report.succeeded() && config.settings.fail_on_build_error =>
            {
                CommandResult::failure(1)
            }
            _ => CommandResult::success(),
        })
    }
}

impl Command for BuildCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.load(ui)?;
        let resolver = system_resolver(config.settings.resolver);
        self.run(&config, ui, resolver.as_ref(), &SystemRunner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandOptions, CommandResult as RunResult, CommandSpec};
    use crate::ui::MockUI;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Everything;

    impl ToolResolver for Everything {
        fn resolve(&self, tool: &str) -> Option<PathBuf> {
            Some(PathBuf::from("/bin").join(tool))
        }
    }

    struct ExitWith(i32);

    impl ProcessRunner for ExitWith {
        fn run(&self, spec: &CommandSpec, _options: &CommandOptions) -> Result<RunResult> {
            let command = spec.to_string();
            Ok(if self.0 == 0 {
                RunResult::success(command, String::new(), String::new(), Duration::ZERO)
            } else {
                RunResult::failure(
                    command,
                    Some(self.0),
                    String::new(),
                    "failed".into(),
                    Duration::ZERO,
                )
            })
        }
    }

    fn project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".vmbuild.yml"), config).unwrap();
        temp
    }

    #[test]
    fn successful_build_exits_zero() {
        let temp = project("dependencies: [sh]\n");
        let cmd = BuildCommand::new(temp.path(), None, BuildArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute_with(&mut ui, &Everything, &ExitWith(0)).unwrap();

        assert!(result.success);
        assert!(temp.path().join("dist").is_dir());
    }

    #[test]
    fn failed_build_exits_one_by_default() {
        let temp = project("dependencies: [sh]\n");
        let cmd = BuildCommand::new(temp.path(), None, BuildArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute_with(&mut ui, &Everything, &ExitWith(2)).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_warning("Build completed with errors."));
    }

    #[test]
    fn failed_build_can_be_tolerated() {
        let temp = project("dependencies: [sh]\nsettings:\n  fail_on_build_error: false\n");
        let cmd = BuildCommand::new(temp.path(), None, BuildArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute_with(&mut ui, &Everything, &ExitWith(2)).unwrap();

        assert!(result.success);
        assert!(ui.has_warning("Build completed with errors."));
    }

    #[test]
    fn output_dir_flag_overrides_config() {
        let temp = project("dependencies: [sh]\noutput_dir: dist\n");
        let args = BuildArgs {
            output_dir: Some(PathBuf::from("custom")),
            dry_run: false,
        };
        let cmd = BuildCommand::new(temp.path(), None, args);
        let mut ui = MockUI::new();

        cmd.execute_with(&mut ui, &Everything, &ExitWith(0)).unwrap();

        assert!(temp.path().join("custom").is_dir());
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn empty_output_dir_flag_is_rejected() {
        let temp = project("dependencies: [sh]\n");
        let args = BuildArgs {
            output_dir: Some(PathBuf::new()),
            dry_run: false,
        };
        let cmd = BuildCommand::new(temp.path(), None, args);
        let mut ui = MockUI::new();

        let err = cmd
            .execute_with(&mut ui, &Everything, &ExitWith(0))
            .unwrap_err();

        assert!(err.to_string().contains("output_dir must not be empty"));
        assert!(!ui.has_success("All dependencies are satisfied."));
    }

    #[test]
    fn config_output_mode_applies_without_flag() {
        let temp = project("dependencies: [sh]\nsettings:\n  output: quiet\n");
        let cmd = BuildCommand::new(temp.path(), None, BuildArgs::default());
        let mut ui = MockUI::new();

        cmd.execute_with(&mut ui, &Everything, &ExitWith(0)).unwrap();

        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn cli_flag_wins_over_config_output_mode() {
        let temp = project("dependencies: [sh]\nsettings:\n  output: quiet\n");
        let cmd = BuildCommand::new(temp.path(), None, BuildArgs::default());
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        cmd.execute_with(&mut ui, &Everything, &ExitWith(0)).unwrap();

        assert_eq!(ui.output_mode(), OutputMode::Verbose);
    }
}
