//! vshell entry point.
//!
//! Mounts the configured archive (or the demo tree), optionally runs a
//! startup script, then reads commands from stdin until `exit` or EOF.

mod cli;

use std::io::{BufRead, IsTerminal, Write};

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use vshell_terminal::{CommandRegistry, ScriptRunner, Shell, register_builtins};
use vshell_types::config::ShellConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Cli::parse().resolve_config()?;
    let mut display = |line: &str| println!("{line}");

    let (vfs, load_error) = vshell_vfs::load_or_default(config.archive.as_deref());
    if let Some(e) = load_error {
        display(&format!("warning: {e}; using the built-in demo tree"));
    }

    let mut registry = CommandRegistry::with_os_env(std::env::vars_os());
    registry.set_home_vars(&config.home_var, &config.home_fallback_var);
    register_builtins(&mut registry);
    let mut shell = Shell::new(vfs, registry);

    if config.banner {
        print_banner(&shell, &mut display);
    }

    if let Some(script) = &config.script {
        if let Err(e) = ScriptRunner::new(config.prompt.as_str()).run_path(script, &mut shell, &mut display) {
            log::debug!("Startup script {} did not run: {e}", script.display());
        }
    }

    if !shell.has_exited() {
        interactive(&mut shell, &config, &mut display)?;
    }
    Ok(())
}

fn print_banner(shell: &Shell, display: &mut dyn FnMut(&str)) {
    let names: Vec<&str> = shell
        .registry()
        .list_commands()
        .iter()
        .map(|(name, _)| *name)
        .collect();
    display("Welcome to vshell!");
    display(&format!("Available commands: {}, history, help", names.join(", ")));
    display("Environment variable expansion supported: $HOME, ${USER}, ~");
    display(&"-".repeat(50));
}

/// Read lines from stdin until EOF or `exit`. Input is echoed when stdin is
/// not a terminal so transcripts read like a session.
fn interactive(shell: &mut Shell, config: &ShellConfig, display: &mut dyn FnMut(&str)) -> Result<()> {
    let stdin = std::io::stdin();
    let tty = stdin.is_terminal();
    let mut lines = stdin.lock().split(b'\n');

    loop {
        if tty {
            print!("{}", config.prompt);
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let bytes = line?;
        let line = String::from_utf8_lossy(&bytes);
        if line.trim().is_empty() {
            continue;
        }
        if !tty {
            display(&format!("{}{}", config.prompt, line.trim()));
        }
        for out in shell.execute(&line) {
            display(&out);
        }
        if shell.has_exited() {
            break;
        }
    }
    Ok(())
}
