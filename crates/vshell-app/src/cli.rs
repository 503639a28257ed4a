//! Command-line flags and how they combine with the config file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use vshell_types::config::ShellConfig;

#[derive(Debug, Parser)]
#[command(name = "vshell")]
#[command(about = "A shell emulator over an in-memory file tree")]
#[command(version)]
pub struct Cli {
    /// Zip archive to mount as the file tree
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Script to run after startup
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not print the welcome banner
    #[arg(long)]
    pub no_banner: bool,
}

impl Cli {
    /// Load the config file (if any) and apply flag overrides.
    pub fn resolve_config(&self) -> Result<ShellConfig> {
        let mut config = match &self.config {
            Some(path) => ShellConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ShellConfig::default(),
        };
        if let Some(archive) = &self.archive {
            config.archive = Some(archive.clone());
        }
        if let Some(script) = &self.script {
            config.script = Some(script.clone());
        }
        if self.no_banner {
            config.banner = false;
        }
        Ok(config)
    }
}
