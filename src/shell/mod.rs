//! Subprocess execution.

pub mod command;
pub mod platform;

pub use command::{
    run_command, CommandOptions, CommandResult, CommandSpec, ProcessRunner, SystemRunner,
};
pub use platform::{is_ci, lookup_command, shell_invocation, shell_quote};
