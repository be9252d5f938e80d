//! Configuration file discovery and loading.

use crate::config::schema::BuildConfig;
use crate::config::validator::validate;
use crate::error::{BuildError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".vmbuild.yml";

/// Find the project config at `<project_root>/.vmbuild.yml`.
pub fn find_config(project_root: &Path) -> Option<PathBuf> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Load a single config file and parse it into BuildConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<BuildConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BuildError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BuildError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into BuildConfig.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<BuildConfig> {
    if content.trim().is_empty() {
        return Ok(BuildConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| BuildError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and validate the config for a project.
///
/// An explicit path must exist. Without one, `.vmbuild.yml` in the project
/// root is used when present, and the built-in defaults otherwise.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<BuildConfig> {
    let config = match explicit {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(path)?
        }
        None => match find_config(project_root) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                load_config_file(&path)?
            }
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                BuildConfig::default()
            }
        },
    };

    validate(&config)?;
    Ok(config)
}
