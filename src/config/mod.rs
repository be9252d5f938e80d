//! Configuration loading, parsing, and validation for vmbuild.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//! - Variable interpolation in [`interpolation`]
//!
//! # Example
//!
//! ```
//! use vmbuild::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".vmbuild.yml"), "output_dir: out").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.output_dir, std::path::PathBuf::from("out"));
//! ```

pub mod interpolation;
pub mod loader;
pub mod schema;
pub mod validator;

pub use interpolation::{parse_interpolation, resolve_string, Segment};
pub use loader::{find_config, load_config, load_config_file, parse_config, CONFIG_FILE_NAME};
pub use schema::{BuildConfig, OutputMode, ResolverKind, Settings, DEFAULT_DEPENDENCIES};
pub use validator::{validate, KNOWN_VARIABLES};
