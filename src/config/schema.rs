//! Configuration schema definitions for vmbuild.
//!
//! This module contains the struct definitions that map to the
//! `.vmbuild.yml` file format. Every field has a default, so an absent
//! file or an empty one describes the stock vmodem99-a build.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::shell::CommandSpec;

/// Tools the stock build expects on `PATH`, in reporting order.
pub const DEFAULT_DEPENDENCIES: &[&str] = &[
    "figlet", "argc", "wget", "curl", "telnet", "ssh", "mosh", "bash",
];

/// Root configuration structure for `.vmbuild.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Executables that must resolve before anything runs.
    pub dependencies: Vec<String>,

    /// Artifact directory, relative to the project root.
    pub output_dir: PathBuf,

    /// Commands run after the dependency check and before the build.
    pub pre_build: Vec<CommandSpec>,

    /// The build invocation.
    pub build: CommandSpec,

    /// Global settings
    pub settings: Settings,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dependencies: DEFAULT_DEPENDENCIES.iter().map(|s| s.to_string()).collect(),
            output_dir: PathBuf::from("dist"),
            pre_build: vec![CommandSpec::Shell(
                "echo 'Compiling source code...'".to_string(),
            )],
            build: CommandSpec::Argv {
                program: "argc".to_string(),
                args: vec![
                    "--argc-build".to_string(),
                    "Main.sh".to_string(),
                    "${output_dir}/vmodem99-a".to_string(),
                ],
            },
            settings: Settings::default(),
        }
    }
}

/// Settings that shape how the build is checked and reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How dependency names are resolved.
    pub resolver: ResolverKind,

    /// Exit non-zero when the build or a pre-build step fails.
    #[serde(default = "default_true")]
    pub fail_on_build_error: bool,

    /// Default output mode, unless `--verbose` or `--quiet` is given.
    pub output: OutputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolver: ResolverKind::default(),
            fail_on_build_error: true,
            output: OutputMode::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Strategy used to decide whether a dependency is installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Walk `PATH` entries directly.
    #[default]
    Path,
    /// Ask the platform shell (`command -v` / `where`). Builtins and
    /// functions the shell reports without a file path count as missing.
    Shell,
}

/// Output verbosity as written in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}
