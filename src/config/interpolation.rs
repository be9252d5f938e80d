//! Variable interpolation for command strings.
//!
//! Command strings and arguments may reference `${variable}`.
//!
//! # Syntax
//!
//! - `${variable_name}` - replaced with variable value
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use vmbuild::config::resolve_string;
//!
//! let mut vars = HashMap::new();
//! vars.insert("output_dir".to_string(), "dist".to_string());
//! let arg = resolve_string("${output_dir}/vmodem99-a", &vars).unwrap();
//! assert_eq!(arg, "dist/vmodem99-a");
//! ```

use crate::error::{BuildError, Result};
use std::collections::HashMap;

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a string containing ${var} interpolations.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            current_literal.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                if chars.peek() == Some(&'{') {
                    // $${...} -> literal ${...}
                    chars.next();
                    current_literal.push_str("${");
                    for c in chars.by_ref() {
                        current_literal.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                } else {
                    current_literal.push('$');
                }
            }
            Some('{') => {
                chars.next();

                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                segments.push(Segment::Variable(var_name));
            }
            _ => current_literal.push(c),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Resolve every `${name}` in `input` from `vars`.
///
/// # Errors
///
/// Returns `ConfigValidationError` naming the first unknown variable.
pub fn resolve_string(input: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    for segment in parse_interpolation(input) {
        match segment {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Variable(name) => match vars.get(name.trim()) {
                Some(value) => out.push_str(value),
                None => {
                    return Err(BuildError::ConfigValidationError {
                        message: format!("Unknown variable '${{{}}}' in '{}'", name, input),
                    })
                }
            },
        }
    }
    Ok(out)
}
