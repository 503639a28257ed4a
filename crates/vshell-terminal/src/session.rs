//! A shell session: one store plus one registry, driven a line at a time.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use vshell_types::error::{Result, ShellError};
use vshell_vfs::VfsStore;

use crate::interpreter::{CommandOutput, CommandRegistry};

/// Owns the session state that the front end used to keep in widgets.
pub struct Shell {
    vfs: VfsStore,
    registry: CommandRegistry,
    exited: bool,
}

impl Shell {
    pub fn new(vfs: VfsStore, registry: CommandRegistry) -> Self {
        Self {
            vfs,
            registry,
            exited: false,
        }
    }

    /// Run one line and return its raw outcome. A command that panics is
    /// reported as [`ShellError::Internal`] for this line only.
    pub fn try_execute(&mut self, line: &str) -> Result<CommandOutput> {
        let Self { vfs, registry, .. } = self;
        let output = panic::catch_unwind(AssertUnwindSafe(|| registry.execute(line, vfs)))
            .map_err(|payload| {
                let msg = panic_message(payload.as_ref());
                log::error!("Command panicked on {line:?}: {msg}");
                ShellError::Internal(msg)
            })??;
        if output == CommandOutput::Exit {
            self.exited = true;
        }
        Ok(output)
    }

    /// Run one line and return the lines to display. Errors are rendered,
    /// never propagated.
    pub fn execute(&mut self, line: &str) -> Vec<String> {
        match self.try_execute(line) {
            Ok(output) => output.into_lines(),
            Err(e) => vec![format!("error: {e}")],
        }
    }

    /// Whether `exit` has been run.
    pub fn has_exited(&self) -> bool {
        self.exited
    }

    pub fn vfs(&self) -> &VfsStore {
        &self.vfs
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn history(&self) -> &[String] {
        self.registry.history()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "command panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Command;
    use crate::register_builtins;

    struct FaultyCmd;
    impl Command for FaultyCmd {
        fn name(&self) -> &str {
            "faulty"
        }
        fn description(&self) -> &str {
            "Index past the end of an empty list"
        }
        fn usage(&self) -> &str {
            "faulty"
        }
        fn execute(&self, args: &[&str], _vfs: &mut VfsStore) -> Result<CommandOutput> {
            let empty: Vec<&str> = Vec::new();
            Ok(CommandOutput::Text(empty[args.len() + 3].to_string()))
        }
    }

    fn shell() -> Shell {
        let mut reg = CommandRegistry::with_env([("USER".to_string(), "ada".to_string())]);
        register_builtins(&mut reg);
        Shell::new(vshell_vfs::create_default(), reg)
    }

    #[test]
    fn execute_returns_lines() {
        let mut sh = shell();
        assert_eq!(sh.execute("cd /home/user"), vec!["/home/user"]);
        assert_eq!(sh.vfs().current_dir(), "/home/user");
    }

    #[test]
    fn errors_render_as_lines() {
        let mut sh = shell();
        assert_eq!(sh.execute("nope"), vec!["error: nope: command not found"]);
        assert_eq!(
            sh.execute("ls 'x"),
            vec!["error: parse error: unterminated single quote"]
        );
        assert_eq!(sh.history(), ["nope", "ls 'x"]);
    }

    #[test]
    fn bare_variable_line() {
        let mut sh = shell();
        assert_eq!(sh.execute("$USER"), vec!["ada"]);
    }

    #[test]
    fn exit_marks_session() {
        let mut sh = shell();
        assert!(!sh.has_exited());
        assert!(sh.execute("exit").is_empty());
        assert!(sh.has_exited());
    }

    #[test]
    fn registry_is_reachable() {
        let sh = shell();
        let names: Vec<&str> = sh.registry().list_commands().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["cd", "chmod", "du", "exit", "ls", "rm"]);
    }

    #[test]
    fn panicking_command_becomes_line_error() {
        let mut reg = CommandRegistry::new();
        register_builtins(&mut reg);
        reg.register(Box::new(FaultyCmd));
        let mut sh = Shell::new(vshell_vfs::create_default(), reg);

        match sh.try_execute("faulty") {
            Err(ShellError::Internal(msg)) => assert!(msg.contains("index out of bounds")),
            other => panic!("expected Internal, got {other:?}"),
        }
        let lines = sh.execute("faulty");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("error: internal error: "));
        assert_eq!(sh.execute("cd /home/user"), vec!["/home/user"]);
        assert_eq!(sh.history(), ["faulty", "faulty", "cd /home/user"]);
    }
}
