//! Shell command execution.

use crate::error::{BuildError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::platform::shell_invocation;

/// A command to execute.
///
/// In config a plain string is a shell line and a `{program, args}` map is
/// an argument vector that never goes through a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// Interpreted by the platform shell (redirection, pipes, globbing).
    Shell(String),

    /// Executed directly with the given arguments.
    Argv {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl CommandSpec {
    /// Shorthand for an argv command.
    pub fn argv<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Argv {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn to_command(&self) -> Command {
        match self {
            CommandSpec::Shell(line) => {
                let (shell, flag) = shell_invocation();
                let mut cmd = Command::new(shell);
                cmd.arg(flag).arg(line);
                cmd
            }
            CommandSpec::Argv { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSpec::Shell(line) => f.write_str(line),
            CommandSpec::Argv { program, args } => {
                f.write_str(program)?;
                for arg in args {
                    if arg.is_empty() || arg.contains(char::is_whitespace) {
                        write!(f, " '{}'", arg)?;
                    } else {
                        write!(f, " {}", arg)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// The command as displayed to the user.
    pub command: String,

    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(command: String, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            command,
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            command,
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,
}

impl CommandOptions {
    /// Run in the given directory.
    pub fn in_dir(cwd: &Path) -> Self {
        Self {
            cwd: Some(cwd.to_path_buf()),
            ..Default::default()
        }
    }
}

/// Spawns subprocesses.
///
/// Implementations must wait for the child and release its pipes before
/// returning. A child that could not be created is an `Err`; one that ran
/// and exited non-zero is an `Ok` with `success == false`.
pub trait ProcessRunner {
    fn run(&self, spec: &CommandSpec, options: &CommandOptions) -> Result<CommandResult>;
}

/// Runs commands on the host with both streams captured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, options: &CommandOptions) -> Result<CommandResult> {
        let start = Instant::now();
        let shown = spec.to_string();

        let mut cmd = spec.to_command();

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Spawning: {}", shown);

        // output() waits for exit and drains both pipes, so nothing is left behind.
        let output = cmd.output().map_err(|source| BuildError::SpawnFailed {
            command: shown.clone(),
            source,
        })?;

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        tracing::debug!(
            "'{}' exited with {:?} after {:?}",
            shown,
            output.status.code(),
            duration
        );

        if output.status.success() {
            Ok(CommandResult::success(shown, stdout, stderr, duration))
        } else {
            Ok(CommandResult::failure(
                shown,
                output.status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }
}

/// Run a shell command line with both streams captured.
pub fn run_command(command: &str) -> Result<CommandResult> {
    SystemRunner.run(
        &CommandSpec::Shell(command.to_string()),
        &CommandOptions::default(),
    )
}
