//! Built-in commands for the vshell terminal.

use vshell_types::error::{Result, ShellError};
use vshell_vfs::VfsStore;
use vshell_vfs::path::join;
use vshell_vfs::store::validate_mode;

use crate::interpreter::{Command, CommandOutput, CommandRegistry};

/// Size charged for each subdirectory by `du`.
pub const DIR_BLOCK_SIZE: u64 = 4096;

/// Register all built-in commands into a registry.
///
/// `history` and `help` are handled by the registry itself.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(DuCmd));
    reg.register(Box::new(RmCmd));
    reg.register(Box::new(ChmodCmd));
    reg.register(Box::new(ExitCmd));
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls [path]"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        let path = vfs.resolve(args.first().copied().unwrap_or("."));
        if vfs.has_file(&path) {
            let name = path.rsplit('/').next().unwrap_or(&path);
            return Ok(CommandOutput::Text(file_line(vfs, &path, name)));
        }
        if !vfs.has_dir(&path) {
            return Err(ShellError::NotFound(path));
        }

        let (dirs, files) = vfs.list_children(&path);
        if dirs.is_empty() && files.is_empty() {
            return Ok(CommandOutput::Text("(empty)".to_string()));
        }
        let mut lines: Vec<String> = dirs.iter().map(|d| format!("{d}/")).collect();
        for name in &files {
            lines.push(file_line(vfs, &join(&path, name), name));
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

fn file_line(vfs: &VfsStore, path: &str, name: &str) -> String {
    match vfs.permissions(path) {
        Some(mode) => format!("{name}  [{mode}]"),
        None => name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change working directory"
    }
    fn usage(&self) -> &str {
        "cd [path]"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        let target = args.first().copied().unwrap_or("/");
        vfs.set_current_dir(target)?;
        Ok(CommandOutput::Text(vfs.current_dir().to_string()))
    }
}

// ---------------------------------------------------------------------------
// du
// ---------------------------------------------------------------------------

struct DuCmd;
impl Command for DuCmd {
    fn name(&self) -> &str {
        "du"
    }
    fn description(&self) -> &str {
        "Show disk usage of a directory's direct entries"
    }
    fn usage(&self) -> &str {
        "du [path]"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        let dir = vfs.resolve(args.first().copied().unwrap_or("."));
        if !vfs.has_dir(&dir) {
            return Err(ShellError::NotFound(dir));
        }

        let (dirs, files) = vfs.list_children(&dir);
        if dirs.is_empty() && files.is_empty() {
            return Ok(CommandOutput::Text("0\ttotal (empty)".to_string()));
        }

        let mut lines = Vec::new();
        let mut total = 0u64;
        for name in &files {
            let path = join(&dir, name);
            let size = vfs.size_of(&path)?;
            total += size;
            lines.push(format!("{size}\t{path}"));
        }
        for name in &dirs {
            total += DIR_BLOCK_SIZE;
            lines.push(format!("{DIR_BLOCK_SIZE}\t{}/", join(&dir, name)));
        }
        lines.push(format!("{total}\ttotal"));
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// rm
// ---------------------------------------------------------------------------

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn description(&self) -> &str {
        "Remove a file"
    }
    fn usage(&self) -> &str {
        "rm <path>"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        let [target] = args else {
            return Err(ShellError::Usage(self.usage().to_string()));
        };
        let path = vfs.resolve(target);
        vfs.remove_file(&path)?;
        Ok(CommandOutput::Text(format!("removed '{path}'")))
    }
}

// ---------------------------------------------------------------------------
// chmod
// ---------------------------------------------------------------------------

struct ChmodCmd;
impl Command for ChmodCmd {
    fn name(&self) -> &str {
        "chmod"
    }
    fn description(&self) -> &str {
        "Change a file's mode string"
    }
    fn usage(&self) -> &str {
        "chmod <mode> <path>"
    }
    fn execute(&self, args: &[&str], vfs: &mut VfsStore) -> Result<CommandOutput> {
        let [mode, target] = args else {
            return Err(ShellError::Usage(self.usage().to_string()));
        };
        validate_mode(mode)?;
        let path = vfs.resolve(target);
        vfs.set_permissions(&path, mode)?;
        Ok(CommandOutput::Text(format!(
            "mode of '{path}' changed to {mode}"
        )))
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "End the session"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &[&str], _vfs: &mut VfsStore) -> Result<CommandOutput> {
        Ok(CommandOutput::Exit)
    }
}
