//! Platform-specific shell selection.

use super::command::CommandSpec;

/// Shell and flag used to interpret a command line.
///
/// Always the system shell rather than `$SHELL`, so build lines behave the
/// same regardless of the user's login shell.
pub fn shell_invocation() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

/// Command that prints a tool's location and exits non-zero when absent.
///
/// The name travels as a positional argument, never as part of the script,
/// so shell metacharacters in it are matched literally.
pub fn lookup_command(tool: &str) -> CommandSpec {
    if cfg!(target_os = "windows") {
        CommandSpec::argv("where", [tool])
    } else {
        CommandSpec::argv("sh", ["-c", "command -v \"$1\"", "sh", tool])
    }
}

/// Quote `value` as one word for the line [`shell_invocation`] runs.
///
/// Words made only of safe characters are returned unchanged.
pub fn shell_quote(value: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "_-./:@%+=,".contains(c);
    if !value.is_empty() && value.chars().all(safe) {
        return value.to_string();
    }

    if cfg!(target_os = "windows") {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}

/// Check if running in a CI environment.
///
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}
