//! Command trait, registry, and dispatch logic.
//!
//! The registry owns the shell's variables and history. A line is recorded in
//! history, split and expanded, then routed to the command registered under
//! its first word. Command names are case-sensitive.

use std::collections::HashMap;
use std::ffi::OsString;

use vshell_types::error::{Result, ShellError};
use vshell_vfs::VfsStore;

use crate::expand::{Expander, tokenize};

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to the front end that the session should end.
    Exit,
}

impl CommandOutput {
    /// Split into display lines. Signals produce no lines.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Self::Text(text) => text.lines().map(str::to_string).collect(),
            Self::None | Self::Exit => Vec::new(),
        }
    }
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "ls \[path\]").
    fn usage(&self) -> &str;

    /// Execute the command with the given arguments against the store.
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput>;
}

/// Registry of available commands with dispatch.
///
/// Also holds persistent shell state: variables and history.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
    variables: HashMap<String, String>,
    home_var: String,
    home_fallback_var: String,
    history: Vec<String>,
}

impl CommandRegistry {
    /// Create an empty command registry with no variables.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            variables: HashMap::new(),
            home_var: "HOME".to_string(),
            home_fallback_var: "USERPROFILE".to_string(),
            history: Vec::new(),
        }
    }

    /// Create a registry whose variables are seeded from `vars`.
    pub fn with_env(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut reg = Self::new();
        reg.variables.extend(vars);
        reg
    }

    /// Like [`with_env`](Self::with_env) for raw OS pairs such as
    /// `std::env::vars_os()`. Pairs that are not valid UTF-8 are skipped.
    pub fn with_os_env(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        Self::with_env(vars.into_iter().filter_map(|(k, v)| {
            match (k.into_string(), v.into_string()) {
                (Ok(k), Ok(v)) => Some((k, v)),
                (k, _) => {
                    log::debug!("Skipping non-UTF-8 environment variable {k:?}");
                    None
                },
            }
        }))
    }

    /// Choose the variables consulted for `~` expansion.
    pub fn set_home_vars(&mut self, primary: &str, fallback: &str) {
        self.home_var = primary.to_string();
        self.home_fallback_var = fallback.to_string();
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    // -- Variable API --

    pub fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }

    pub fn get_variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    // -- History API --

    /// Every recorded input line, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Split `line` into words and expand each one.
    pub fn tokenize_and_expand(&self, line: &str) -> Result<Vec<String>> {
        let expander = Expander::new(&self.variables, &self.home_var, &self.home_fallback_var);
        Ok(tokenize(line)?
            .iter()
            .map(|word| expander.expand_word(word))
            .collect())
    }

    /// Record, parse, and execute one input line.
    ///
    /// Blank lines are ignored and not recorded. Everything else enters
    /// history before parsing, so lines that fail to parse are kept too.
    pub fn execute(&mut self, line: &str, vfs: &mut VfsStore) -> Result<CommandOutput> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(CommandOutput::None);
        }
        self.history.push(trimmed.to_string());

        let tokens = self.tokenize_and_expand(trimmed)?;
        if tokens.is_empty() {
            return Ok(CommandOutput::None);
        }

        // A lone `~...` or `$...` word prints its value instead of running.
        if tokens.len() == 1 && (trimmed.starts_with('~') || trimmed.starts_with('$')) {
            return Ok(CommandOutput::Text(tokens[0].clone()));
        }

        self.dispatch(&tokens, vfs)
    }

    /// Route `tokens[0]` to its command with the remaining tokens as args.
    pub fn dispatch(&self, tokens: &[String], vfs: &mut VfsStore) -> Result<CommandOutput> {
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(CommandOutput::None);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        log::debug!("dispatch {name} {args:?}");

        // Intercept built-in commands that need registry access.
        match name.as_str() {
            "history" => return Ok(self.execute_history()),
            "help" => return self.execute_help(&args),
            _ => {},
        }

        match self.commands.get(name.as_str()) {
            Some(cmd) => cmd.execute(&args, vfs),
            None => Err(ShellError::CommandNotFound(name.clone())),
        }
    }

    // -- Intercepted commands --

    /// Built-in `history` command.
    fn execute_history(&self) -> CommandOutput {
        if self.history.is_empty() {
            return CommandOutput::Text("(no history)".to_string());
        }
        let mut out = String::new();
        for (i, entry) in self.history.iter().enumerate() {
            out.push_str(&format!("  {:4}  {entry}\n", i + 1));
        }
        CommandOutput::Text(out.trim_end().to_string())
    }

    /// Built-in help with access to the registry.
    fn execute_help(&self, args: &[&str]) -> Result<CommandOutput> {
        if let Some(&name) = args.first() {
            return match name {
                "history" => Ok(CommandOutput::Text("Usage: history".to_string())),
                "help" => Ok(CommandOutput::Text("Usage: help [command]".to_string())),
                _ => match self.commands.get(name) {
                    Some(cmd) => Ok(CommandOutput::Text(format!(
                        "{}\n  {}\n  Usage: {}",
                        cmd.name(),
                        cmd.description(),
                        cmd.usage()
                    ))),
                    None => Err(ShellError::CommandNotFound(name.to_string())),
                },
            };
        }

        let mut cmds = self.list_commands();
        cmds.push(("help", "List commands or show usage"));
        cmds.push(("history", "Show executed command lines"));
        cmds.sort_by_key(|(name, _)| *name);
        let mut out = format!("Commands ({}):\n", cmds.len());
        for (name, desc) in &cmds {
            out.push_str(&format!("  {name:10} {desc}\n"));
        }
        out.push_str("Type 'help <command>' for usage.");
        Ok(CommandOutput::Text(out))
    }

    /// Return a sorted list of (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
