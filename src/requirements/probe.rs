//! Tool resolution on the command search path.
//!
//! Two strategies implement [`ToolResolver`]:
//!
//! - [`PathResolver`] walks `PATH` itself and never spawns anything.
//! - [`ShellProbeResolver`] asks the platform shell (`command -v` on Unix,
//!   `where` on Windows). Only answers that name a file count, so shell
//!   builtins such as `cd` are missing under both strategies.
//!
//! # Example
//!
//! ```no_run
//! use vmbuild::requirements::probe::{PathResolver, ToolResolver};
//!
//! let resolver = PathResolver::from_env();
//! if let Some(path) = resolver.resolve("bash") {
//!     println!("bash at {}", path.display());
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::shell::{lookup_command, CommandOptions, ProcessRunner};

/// Decides whether a tool name is available on this host.
///
/// Absence is a normal answer (`None`), never an error.
pub trait ToolResolver {
    fn resolve(&self, tool: &str) -> Option<PathBuf>;
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Candidate file names for `tool` in one directory.
#[cfg(windows)]
fn candidates(dir: &Path, tool: &str) -> Vec<PathBuf> {
    let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    std::iter::once(dir.join(tool))
        .chain(
            exts.split(';')
                .filter(|e| !e.is_empty())
                .map(|ext| dir.join(format!("{}{}", tool, ext))),
        )
        .collect()
}

#[cfg(not(windows))]
fn candidates(dir: &Path, tool: &str) -> Vec<PathBuf> {
    vec![dir.join(tool)]
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Names containing
/// a path separator are checked as given.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    if tool.is_empty() {
        return None;
    }

    if tool.contains(std::path::MAIN_SEPARATOR) || tool.contains('/') {
        let direct = PathBuf::from(tool);
        return is_executable(&direct).then_some(direct);
    }

    path_entries
        .iter()
        .flat_map(|dir| candidates(dir, tool))
        .find(|candidate| is_executable(candidate))
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Resolves tools against a fixed list of directories.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    entries: Vec<PathBuf>,
}

impl PathResolver {
    /// Use the current process `PATH`.
    pub fn from_env() -> Self {
        Self::new(parse_system_path())
    }

    /// Use an explicit list of directories.
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }
}

impl ToolResolver for PathResolver {
    fn resolve(&self, tool: &str) -> Option<PathBuf> {
        let found = resolve_tool_path(tool, &self.entries);
        tracing::debug!("PATH lookup for '{}': {:?}", tool, found);
        found
    }
}

/// Resolves tools by running the shell's lookup command.
///
/// Both streams of the probe are captured, so nothing reaches the
/// program's own output.
#[derive(Debug, Clone, Default)]
pub struct ShellProbeResolver<R> {
    runner: R,
}

impl<R: ProcessRunner> ShellProbeResolver<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: ProcessRunner> ToolResolver for ShellProbeResolver<R> {
    fn resolve(&self, tool: &str) -> Option<PathBuf> {
        if tool.trim().is_empty() {
            return None;
        }

        let spec = lookup_command(tool);
        match self.runner.run(&spec, &CommandOptions::default()) {
            Ok(result) if result.success => {
                let first = result.stdout.lines().next().unwrap_or_default().trim();
                // Builtins and functions print their bare name.
                if !first.contains(['/', '\\']) {
                    tracing::debug!("Shell probe for '{}' found no file: {:?}", tool, first);
                    return None;
                }
                tracing::debug!("Shell probe for '{}' found {}", tool, first);
                Some(PathBuf::from(first))
            }
            Ok(result) => {
                tracing::debug!(
                    "Shell probe for '{}' exited with {:?}",
                    tool,
                    result.exit_code
                );
                None
            }
            Err(e) => {
                tracing::debug!("Shell probe for '{}' could not run: {}", tool, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::SystemRunner;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn resolve_finds_first_executable_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_executable(second.path(), "figlet");
        let expected = make_executable(first.path(), "figlet");

        let entries = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(resolve_tool_path("figlet", &entries), Some(expected));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_skips_non_executable_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mosh"), "not a program").unwrap();

        let entries = vec![dir.path().to_path_buf()];
        assert_eq!(resolve_tool_path("mosh", &entries), None);
    }

    #[cfg(unix)]
    #[test]
    fn resolve_skips_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("ssh")).unwrap();

        let entries = vec![dir.path().to_path_buf()];
        assert_eq!(resolve_tool_path("ssh", &entries), None);
    }

    #[cfg(unix)]
    #[test]
    fn resolve_accepts_explicit_path() {
        let dir = TempDir::new().unwrap();
        let tool = make_executable(dir.path(), "argc");
        let name = tool.to_string_lossy().to_string();
        assert_eq!(resolve_tool_path(&name, &[]), Some(tool));
    }

    #[test]
    fn resolve_empty_name_is_none() {
        assert_eq!(resolve_tool_path("", &parse_system_path()), None);
    }

    #[test]
    fn path_resolver_misses_fabricated_tool() {
        let resolver = PathResolver::from_env();
        assert!(resolver.resolve("definitely-not-a-real-tool").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn path_resolver_finds_sh() {
        let resolver = PathResolver::from_env();
        assert!(resolver.resolve("sh").is_some());
    }

    #[test]
    fn empty_path_resolves_nothing() {
        let resolver = PathResolver::new(vec![]);
        assert!(resolver.resolve("sh").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn shell_probe_finds_sh() {
        let resolver = ShellProbeResolver::new(SystemRunner);
        assert!(resolver.resolve("sh").is_some());
    }

    #[test]
    fn shell_probe_misses_fabricated_tool() {
        let resolver = ShellProbeResolver::new(SystemRunner);
        assert!(resolver.resolve("definitely-not-a-real-tool").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn shell_lookup_treats_metacharacters_literally() {
        let resolver = ShellProbeResolver::new(SystemRunner);
        assert!(resolver.resolve("definitely-not-a-real-tool;true").is_none());
        assert!(resolver.resolve("definitely-not-a-real-tool||true").is_none());
        assert!(resolver.resolve("$(echo sh)").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn shell_lookup_ignores_builtins() {
        let resolver = ShellProbeResolver::new(SystemRunner);
        assert!(resolver.resolve("unset").is_none());
        assert!(resolver.resolve("readonly").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn shell_lookup_returns_absolute_path() {
        let resolver = ShellProbeResolver::new(SystemRunner);
        let path = resolver.resolve("sh").unwrap();
        assert!(path.is_absolute());
    }
}
