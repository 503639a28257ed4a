//! Session configuration.
//!
//! Every field has a default, so an empty TOML document (or no config file
//! at all) yields a usable configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ShellError};

/// Settings consumed when a session is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Zip archive to mount as the virtual file system.
    pub archive: Option<PathBuf>,
    /// Script to run once after startup.
    pub script: Option<PathBuf>,
    /// Environment variable holding the home directory for `~` expansion.
    pub home_var: String,
    /// Consulted when `home_var` is unset.
    pub home_fallback_var: String,
    /// Prefix printed before echoed input lines.
    pub prompt: String,
    /// Print the welcome banner on startup.
    pub banner: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            archive: None,
            script: None,
            home_var: "HOME".to_string(),
            home_fallback_var: "USERPROFILE".to_string(),
            prompt: "> ".to_string(),
            banner: true,
        }
    }
}

impl ShellConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.home_var.is_empty() {
            return Err(ShellError::Config("home_var must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ShellError::NotFound(path.display().to_string()),
            _ => ShellError::Io(e),
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ShellConfig::from_toml_str("").unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.home_var, "HOME");
        assert_eq!(config.home_fallback_var, "USERPROFILE");
        assert!(config.banner);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = ShellConfig::from_toml_str(
            "archive = \"demo.zip\"\nprompt = \"$ \"\nbanner = false\n",
        )
        .unwrap();
        assert_eq!(config.archive, Some(PathBuf::from("demo.zip")));
        assert_eq!(config.prompt, "$ ");
        assert!(!config.banner);
        assert!(config.script.is_none());
    }

    #[test]
    fn unknown_key_rejected() {
        let err = ShellConfig::from_toml_str("colour = \"green\"").unwrap_err();
        assert!(matches!(err, ShellError::TomlParse(_)));
    }

    #[test]
    fn empty_home_var_rejected() {
        let err = ShellConfig::from_toml_str("home_var = \"\"").unwrap_err();
        assert!(matches!(err, ShellError::Config(_)));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ShellError::NotFound(_)));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vshell.toml");
        std::fs::write(&path, "script = \"boot.sh\"\n").unwrap();
        let config = ShellConfig::load(&path).unwrap();
        assert_eq!(config.script, Some(PathBuf::from("boot.sh")));
    }
}
