//! Configuration validation.

use crate::config::interpolation::{parse_interpolation, Segment};
use crate::config::schema::BuildConfig;
use crate::error::{BuildError, Result};
use crate::shell::CommandSpec;

/// Variables available to command strings and arguments.
pub const KNOWN_VARIABLES: &[&str] = &["output_dir", "project_root"];

/// Validate a loaded configuration.
///
/// All problems are collected and reported together.
pub fn validate(config: &BuildConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.dependencies.is_empty() {
        errors.push("dependencies must list at least one tool".to_string());
    }
    for (i, name) in config.dependencies.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(format!("dependencies[{}] is blank", i));
        } else if name.contains(char::is_whitespace) {
            errors.push(format!("dependency '{}' contains whitespace", name));
        }
    }

    if config.output_dir.as_os_str().is_empty() {
        errors.push("output_dir must not be empty".to_string());
    }

    for (i, step) in config.pre_build.iter().enumerate() {
        check_command(&format!("pre_build[{}]", i), step, &mut errors);
    }
    check_command("build", &config.build, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(BuildError::ConfigValidationError {
            message: errors.join("; "),
        })
    }
}

fn check_command(label: &str, spec: &CommandSpec, errors: &mut Vec<String>) {
    let texts: Vec<&str> = match spec {
        CommandSpec::Shell(line) => {
            if line.trim().is_empty() {
                errors.push(format!("{} command is empty", label));
            }
            vec![line.as_str()]
        }
        CommandSpec::Argv { program, args } => {
            if program.trim().is_empty() {
                errors.push(format!("{} program is empty", label));
            }
            std::iter::once(program.as_str())
                .chain(args.iter().map(String::as_str))
                .collect()
        }
    };

    for text in texts {
        for segment in parse_interpolation(text) {
            if let Segment::Variable(name) = segment {
                if !KNOWN_VARIABLES.contains(&name.trim()) {
                    errors.push(format!("{} references unknown variable '{}'", label, name));
                }
            }
        }
    }
}
