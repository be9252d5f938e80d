//! Check-then-build orchestration.
//!
//! A run resolves every dependency first. Any missing tool aborts the run
//! before the filesystem or any subprocess is touched. Otherwise the
//! pre-build steps run, the output directory is ensured, and the build
//! command is invoked.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{resolve_string, BuildConfig};
use crate::error::{BuildError, Result};
use crate::requirements::{check_dependencies, DependencyReport, DependencyStatus, ToolResolver};
use crate::shell::{shell_quote, CommandOptions, CommandResult, CommandSpec, ProcessRunner};
use crate::ui::UserInterface;

/// Printed after the missing-dependency list.
pub const REMEDIATION: &str = "Please install the missing dependencies and try again.";

/// Create `path` (and parents) unless it already exists as a directory.
///
/// Idempotent: a second call on the same path is a no-op.
pub fn ensure_output_dir(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        tracing::debug!("Output directory {} already exists", path.display());
    } else {
        tracing::debug!("Creating output directory {}", path.display());
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

/// Show a finished command the way a build log expects.
///
/// Success surfaces stdout; failure names the command and surfaces stderr.
pub fn report_command_result(ui: &mut dyn UserInterface, result: &CommandResult) {
    if result.success {
        ui.command_output(&result.stdout);
    } else {
        ui.show_error_block(&result.command, &result.stderr);
    }
}

/// Commands and paths for one run, with variables resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPlan {
    pub project_root: PathBuf,
    pub dependencies: Vec<String>,
    /// Output directory as configured (relative to the project root).
    pub output_dir: PathBuf,
    pub pre_build: Vec<CommandSpec>,
    pub build: CommandSpec,
}

impl BuildPlan {
    /// Resolve `${output_dir}` and `${project_root}` in every command.
    ///
    /// Values substituted into shell lines are quoted as single words;
    /// argv entries receive them verbatim.
    pub fn from_config(config: &BuildConfig, project_root: &Path) -> Result<Self> {
        let vars = HashMap::from([
            (
                "output_dir".to_string(),
                config.output_dir.to_string_lossy().to_string(),
            ),
            (
                "project_root".to_string(),
                project_root.to_string_lossy().to_string(),
            ),
        ]);

        let pre_build = config
            .pre_build
            .iter()
            .map(|spec| interpolate(spec, &vars))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            project_root: project_root.to_path_buf(),
            dependencies: config.dependencies.clone(),
            output_dir: config.output_dir.clone(),
            pre_build,
            build: interpolate(&config.build, &vars)?,
        })
    }

    /// Absolute location of the output directory.
    pub fn output_path(&self) -> PathBuf {
        self.project_root.join(&self.output_dir)
    }
}

fn interpolate(spec: &CommandSpec, vars: &HashMap<String, String>) -> Result<CommandSpec> {
    Ok(match spec {
        CommandSpec::Shell(line) => {
            let quoted = vars
                .iter()
                .map(|(name, value)| (name.clone(), shell_quote(value)))
                .collect();
            CommandSpec::Shell(resolve_string(line, &quoted)?)
        }
        CommandSpec::Argv { program, args } => CommandSpec::Argv {
            program: resolve_string(program, vars)?,
            args: args
                .iter()
                .map(|a| resolve_string(a, vars))
                .collect::<Result<Vec<_>>>()?,
        },
    })
}

/// How one command in the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Exited zero.
    Succeeded,
    /// Exited non-zero.
    Failed { exit_code: Option<i32> },
    /// Could not be started.
    SpawnFailed { reason: String },
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Succeeded)
    }
}

/// Per-command record of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub command: String,
    pub status: StepStatus,
}

/// Results of a run that got past the dependency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub pre_build: Vec<StepRecord>,
    pub build: StepRecord,
}

impl BuildReport {
    /// True when every pre-build step and the build succeeded.
    pub fn succeeded(&self) -> bool {
        self.build.status.is_success() && self.pre_build.iter().all(|s| s.status.is_success())
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Dependencies were missing; nothing was run.
    Aborted { missing: Vec<String> },
    /// Dependencies were present and the commands were run.
    Finished(BuildReport),
    /// Dependencies were present; commands were only listed.
    DryRun { commands: Vec<String> },
}

impl BuildOutcome {
    pub fn succeeded(&self) -> bool {
        match self {
            BuildOutcome::Aborted { .. } => false,
            BuildOutcome::Finished(report) => report.succeeded(),
            BuildOutcome::DryRun { .. } => true,
        }
    }
}

/// Runs the dependency check and the build.
pub struct BuildPipeline<'a> {
    plan: &'a BuildPlan,
    resolver: &'a dyn ToolResolver,
    runner: &'a dyn ProcessRunner,
    dry_run: bool,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(
        plan: &'a BuildPlan,
        resolver: &'a dyn ToolResolver,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            plan,
            resolver,
            runner,
            dry_run: false,
        }
    }

    /// List commands instead of running them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolve every dependency without reporting.
    pub fn check(&self) -> DependencyReport {
        check_dependencies(&self.plan.dependencies, self.resolver)
    }

    /// Execute the run, reporting progress through `ui`.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<BuildOutcome> {
        ui.show_header("Checking dependencies");
        let report = self.check();

        if !report.ok() {
            let missing = report.missing();
            let err = BuildError::MissingDependencies {
                missing: missing.clone(),
            };
            ui.error(&err.to_string());
            ui.show_hint(REMEDIATION);
            return Ok(BuildOutcome::Aborted { missing });
        }

        for check in report.checks() {
            if let DependencyStatus::Found(path) = &check.status {
                ui.detail(&format!("{} → {}", check.name, path.display()));
            }
        }
        ui.success("All dependencies are satisfied.");

        if self.dry_run {
            return Ok(self.list_commands(ui));
        }

        ui.message("Building the project...");

        let options = CommandOptions::in_dir(&self.plan.project_root);

        let mut pre_build = Vec::with_capacity(self.plan.pre_build.len());
        for spec in &self.plan.pre_build {
            pre_build.push(self.run_step(ui, spec, &options));
        }

        let output_dir = ensure_output_dir(&self.plan.output_path())?;

        let build = self.run_step(ui, &self.plan.build, &options);

        let report = BuildReport {
            output_dir,
            pre_build,
            build,
        };

        if report.succeeded() {
            ui.success("Build completed successfully.");
        } else {
            ui.warning("Build completed with errors.");
        }

        Ok(BuildOutcome::Finished(report))
    }

    fn list_commands(&self, ui: &mut dyn UserInterface) -> BuildOutcome {
        ui.message("Dry run, nothing will be executed:");
        ui.message(&format!(
            "  mkdir -p {}",
            self.plan.output_dir.to_string_lossy()
        ));

        let commands = self
            .plan
            .pre_build
            .iter()
            .chain(std::iter::once(&self.plan.build))
            .map(|spec| spec.to_string())
            .collect::<Vec<_>>();

        for command in &commands {
            ui.message(&format!("  {}", command));
        }

        BuildOutcome::DryRun { commands }
    }

    fn run_step(
        &self,
        ui: &mut dyn UserInterface,
        spec: &CommandSpec,
        options: &CommandOptions,
    ) -> StepRecord {
        let command = spec.to_string();
        let mut spinner = ui.start_spinner(&format!("Running {}", command));
        let result = self.runner.run(spec, options);
        spinner.finish();

        let status = match result {
            Ok(result) => {
                report_command_result(ui, &result);
                if result.success {
                    StepStatus::Succeeded
                } else {
                    StepStatus::Failed {
                        exit_code: result.exit_code,
                    }
                }
            }
            Err(BuildError::SpawnFailed { command, source }) => {
                ui.error(&format!("Could not start '{}': {}", command, source));
                StepStatus::SpawnFailed {
                    reason: source.to_string(),
                }
            }
            Err(e) => {
                ui.error(&format!("Error running command: {}: {}", command, e));
                StepStatus::SpawnFailed {
                    reason: e.to_string(),
                }
            }
        };

        tracing::debug!("'{}' finished: {:?}", command, status);
        StepRecord { command, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::time::Duration;
    use tempfile::TempDir;

    struct FakeResolver {
        installed: HashSet<String>,
    }

    impl FakeResolver {
        fn all_of(names: &[String]) -> Self {
            Self {
                installed: names.iter().cloned().collect(),
            }
        }

        fn without(names: &[String], absent: &str) -> Self {
            Self {
                installed: names.iter().filter(|n| *n != absent).cloned().collect(),
            }
        }
    }

    impl ToolResolver for FakeResolver {
        fn resolve(&self, tool: &str) -> Option<PathBuf> {
            self.installed
                .contains(tool)
                .then(|| PathBuf::from("/usr/bin").join(tool))
        }
    }

    /// Records commands and answers with a scripted exit code.
    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<String>>,
        failing: Option<String>,
        unspawnable: Option<String>,
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, spec: &CommandSpec, _options: &CommandOptions) -> Result<CommandResult> {
            let command = spec.to_string();
            self.calls.borrow_mut().push(command.clone());

            if self.unspawnable.as_deref() == Some(command.as_str()) {
                return Err(BuildError::SpawnFailed {
                    command,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
            if self.failing.as_deref() == Some(command.as_str()) {
                return Ok(CommandResult::failure(
                    command,
                    Some(2),
                    String::new(),
                    "argc: Main.sh not found\n".into(),
                    Duration::ZERO,
                ));
            }
            Ok(CommandResult::success(
                command,
                "ok\n".into(),
                String::new(),
                Duration::ZERO,
            ))
        }
    }

    fn plan_in(root: &Path) -> BuildPlan {
        BuildPlan::from_config(&BuildConfig::default(), root).unwrap()
    }

    #[test]
    fn ensure_output_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dist");

        ensure_output_dir(&dir).unwrap();
        ensure_output_dir(&dir).unwrap();

        assert!(dir.is_dir());
        let entries = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn ensure_output_dir_creates_parents() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("out").join("nested");
        assert_eq!(ensure_output_dir(&dir).unwrap(), dir);
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_output_dir_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("dist");
        fs::write(&file, "not a dir").unwrap();
        assert!(matches!(ensure_output_dir(&file), Err(BuildError::Io(_))));
    }

    #[test]
    fn plan_resolves_output_dir_in_build_args() {
        let plan = plan_in(Path::new("/work"));
        assert_eq!(
            plan.build.to_string(),
            "argc --argc-build Main.sh dist/vmodem99-a"
        );
        assert_eq!(plan.output_path(), PathBuf::from("/work/dist"));
    }

    #[test]
    fn plan_quotes_variables_in_shell_lines_only() {
        let config = BuildConfig {
            output_dir: PathBuf::from("my dist"),
            pre_build: vec![CommandSpec::Shell("ls ${output_dir}".into())],
            build: CommandSpec::argv(
                "argc",
                ["--argc-build", "Main.sh", "${output_dir}/vmodem99-a"],
            ),
            ..Default::default()
        };
        let plan = BuildPlan::from_config(&config, Path::new("/work")).unwrap();

        let quoted = crate::shell::shell_quote("my dist");
        assert_eq!(plan.pre_build[0], CommandSpec::Shell(format!("ls {}", quoted)));
        assert_eq!(
            plan.build,
            CommandSpec::argv("argc", ["--argc-build", "Main.sh", "my dist/vmodem99-a"])
        );
    }

    #[cfg(unix)]
    #[test]
    fn spaced_output_dir_stays_one_shell_word() {
        let temp = TempDir::new().unwrap();
        let config = BuildConfig {
            output_dir: PathBuf::from("my dist"),
            pre_build: vec![],
            build: CommandSpec::Shell("printf vm > ${output_dir}/vmodem99-a".into()),
            ..Default::default()
        };
        let plan = BuildPlan::from_config(&config, temp.path()).unwrap();
        let resolver = FakeResolver::all_of(&plan.dependencies);
        let mut ui = MockUI::new();

        let outcome = BuildPipeline::new(&plan, &resolver, &crate::shell::SystemRunner)
            .run(&mut ui)
            .unwrap();

        assert!(outcome.succeeded());
        let artifact = fs::read_to_string(temp.path().join("my dist/vmodem99-a")).unwrap();
        assert_eq!(artifact, "vm");
    }

    #[test]
    fn plan_rejects_unknown_variable() {
        let config = BuildConfig {
            build: CommandSpec::Shell("make ${target}".into()),
            ..Default::default()
        };
        assert!(BuildPlan::from_config(&config, Path::new("/work")).is_err());
    }

    #[test]
    fn all_present_runs_build_and_creates_dir() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(temp.path());
        let resolver = FakeResolver::all_of(&plan.dependencies);
        let runner = RecordingRunner::default();
        let mut ui = MockUI::new();

        let outcome = BuildPipeline::new(&plan, &resolver, &runner)
            .run(&mut ui)
            .unwrap();

        assert!(outcome.succeeded());
        assert!(temp.path().join("dist").is_dir());
        assert_eq!(
            *runner.calls.borrow(),
            vec![
                "echo 'Compiling source code...'".to_string(),
                "argc --argc-build Main.sh dist/vmodem99-a".to_string(),
            ]
        );
        assert!(ui.has_success("All dependencies are satisfied."));
        assert!(ui.has_message("Building the project..."));
        assert!(ui.has_success("Build completed successfully."));
        assert_eq!(ui.command_outputs().len(), 2);
    }

    #[test]
    fn failed_build_still_prints_completion() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(temp.path());
        let resolver = FakeResolver::all_of(&plan.dependencies);
        let runner = RecordingRunner {
            failing: Some("argc --argc-build Main.sh dist/vmodem99-a".into()),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let outcome = BuildPipeline::new(&plan, &resolver, &runner)
            .run(&mut ui)
            .unwrap();

        assert!(!outcome.succeeded());
        assert!(ui.has_warning("Build completed with errors."));
        assert_eq!(ui.error_blocks().len(), 1);
        assert_eq!(
            ui.error_blocks()[0].0,
            "argc --argc-build Main.sh dist/vmodem99-a"
        );
        assert!(ui.error_blocks()[0].1.contains("Main.sh not found"));
        match outcome {
            BuildOutcome::Finished(report) => {
                assert_eq!(
                    report.build.status,
                    StepStatus::Failed { exit_code: Some(2) }
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn spawn_failure_is_recorded_distinctly() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(temp.path());
        let resolver = FakeResolver::all_of(&plan.dependencies);
        let runner = RecordingRunner {
            unspawnable: Some("argc --argc-build Main.sh dist/vmodem99-a".into()),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let outcome = BuildPipeline::new(&plan, &resolver, &runner)
            .run(&mut ui)
            .unwrap();

        assert!(ui.has_error("Could not start"));
        assert!(ui.error_blocks().is_empty());
        match outcome {
            BuildOutcome::Finished(report) => {
                assert!(matches!(report.build.status, StepStatus::SpawnFailed { .. }));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn failed_pre_build_step_fails_report_but_build_runs() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(temp.path());
        let resolver = FakeResolver::all_of(&plan.dependencies);
        let runner = RecordingRunner {
            failing: Some("echo 'Compiling source code...'".into()),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let outcome = BuildPipeline::new(&plan, &resolver, &runner)
            .run(&mut ui)
            .unwrap();

        assert_eq!(runner.calls.borrow().len(), 2);
        assert!(!outcome.succeeded());
    }

    #[test]
    fn single_missing_tool_aborts_without_side_effects() {
        let temp = TempDir::new().unwrap();
        let config = BuildConfig {
            dependencies: vec![
                "bash".into(),
                "definitely-not-a-real-tool".into(),
                "curl".into(),
            ],
            ..Default::default()
        };
        let plan = BuildPlan::from_config(&config, temp.path()).unwrap();
        let resolver = FakeResolver::without(&plan.dependencies, "definitely-not-a-real-tool");
        let runner = RecordingRunner::default();
        let mut ui = MockUI::new();

        let outcome = BuildPipeline::new(&plan, &resolver, &runner)
            .run(&mut ui)
            .unwrap();

        assert_eq!(
            outcome,
            BuildOutcome::Aborted {
                missing: vec!["definitely-not-a-real-tool".into()]
            }
        );
        assert!(ui.has_error("Missing dependencies: definitely-not-a-real-tool"));
        assert_eq!(ui.headers(), ["Checking dependencies"]);
        assert!(ui.has_hint(REMEDIATION));
        assert!(!ui.has_message("Building"));
        assert!(runner.calls.borrow().is_empty());
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn dry_run_lists_commands_without_running() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(temp.path());
        let resolver = FakeResolver::all_of(&plan.dependencies);
        let runner = RecordingRunner::default();
        let mut ui = MockUI::new();

        let outcome = BuildPipeline::new(&plan, &resolver, &runner)
            .dry_run(true)
            .run(&mut ui)
            .unwrap();

        assert!(runner.calls.borrow().is_empty());
        assert!(!temp.path().join("dist").exists());
        assert!(ui.has_message("argc --argc-build Main.sh dist/vmodem99-a"));
        match outcome {
            BuildOutcome::DryRun { commands } => assert_eq!(commands.len(), 2),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn verbose_details_list_resolved_paths() {
        let temp = TempDir::new().unwrap();
        let plan = plan_in(temp.path());
        let resolver = FakeResolver::all_of(&plan.dependencies);
        let runner = RecordingRunner::default();
        let mut ui = MockUI::new();

        BuildPipeline::new(&plan, &resolver, &runner)
            .run(&mut ui)
            .unwrap();

        assert!(ui.details().iter().any(|d| d.contains("/usr/bin/figlet")));
    }
}
