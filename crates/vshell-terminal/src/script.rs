//! Script execution.
//!
//! A script is plain text with one command per line. Blank lines and `#`
//! comments are skipped. Each remaining line is echoed, recorded, and run;
//! a failing line is reported with its line number and the run continues.

use std::path::Path;

use vshell_types::error::{Result, ShellError};

use crate::session::Shell;

/// Counts gathered over one script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Lines handed to the shell (comments and blanks excluded).
    pub executed: usize,
    /// Executed lines that reported an error.
    pub failed: usize,
    /// The run stopped early because a line ran `exit`.
    pub stopped_by_exit: bool,
}

/// Feeds script lines into a [`Shell`].
pub struct ScriptRunner {
    prompt: String,
}

impl ScriptRunner {
    /// `prompt` prefixes each echoed line.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Read the script at `path` and run it.
    ///
    /// The whole file is read before any line runs, so an unreadable script
    /// is reported once and executes nothing.
    pub fn run_path(
        &self,
        path: &Path,
        shell: &mut Shell,
        display: &mut dyn FnMut(&str),
    ) -> Result<ScriptSummary> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                let err = match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        ShellError::NotFound(path.display().to_string())
                    },
                    _ => ShellError::Io(e),
                };
                log::warn!("Cannot run script {}: {err}", path.display());
                display(&format!("error: cannot run script: {err}"));
                return Err(err);
            },
        };
        log::info!("Running script {}", path.display());
        Ok(self.run_source(&source, shell, display))
    }

    /// Run every command line in `source`.
    pub fn run_source(
        &self,
        source: &str,
        shell: &mut Shell,
        display: &mut dyn FnMut(&str),
    ) -> ScriptSummary {
        let mut summary = ScriptSummary::default();

        for (idx, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            display(&format!("{}{line}", self.prompt));
            summary.executed += 1;
            match shell.try_execute(line) {
                Ok(output) => {
                    for out in output.into_lines() {
                        display(&out);
                    }
                },
                Err(e) => {
                    summary.failed += 1;
                    display(&format!("error at line {}: {e}", idx + 1));
                },
            }

            if shell.has_exited() {
                summary.stopped_by_exit = true;
                break;
            }
        }
        summary
    }
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new("> ")
    }
}
