//! Command interpreter and terminal subsystem.
//!
//! The terminal is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name. The interpreter splits and
//! expands input lines, resolves the command name, and dispatches `execute()`.

mod commands;
pub mod expand;
mod interpreter;
pub mod script;
mod session;

/// Register the built-in commands (ls, cd, du, rm, chmod, exit) into a registry.
pub use commands::{DIR_BLOCK_SIZE, register_builtins};
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text or an exit signal).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch, variables, and history.
pub use interpreter::CommandRegistry;
/// Line-by-line script execution with per-line error isolation.
pub use script::{ScriptRunner, ScriptSummary};
/// A store plus a registry, driven one input line at a time.
pub use session::Shell;
