//! vmbuild - check required tools, then build vmodem99-a.
//!
//! vmbuild verifies that every external tool the build relies on is
//! installed, then hands the actual compilation to one external command.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Dependency resolution and reporting
//! - [`runner`] - Check-then-build orchestration
//! - [`shell`] - Subprocess execution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use vmbuild::requirements::{check_dependencies, PathResolver};
//!
//! let resolver = PathResolver::new(vec![]);
//! let report = check_dependencies(&["definitely-not-a-real-tool"], &resolver);
//! assert!(!report.ok());
//! assert_eq!(report.missing(), vec!["definitely-not-a-real-tool"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod requirements;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{BuildError, Result};
