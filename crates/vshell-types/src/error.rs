//! Error types for vshell.

use std::fmt;
use std::io;

/// Why a `chmod` mode string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeProblem {
    /// Not exactly three ASCII digits.
    Shape,
    /// Three digits, but at least one is `8` or `9`.
    Range,
}

impl fmt::Display for ModeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape => f.write_str("expected exactly three digits"),
            Self::Range => f.write_str("each digit must be between 0 and 7"),
        }
    }
}

/// Errors produced by the shell core.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0}: no such file or directory")]
    NotFound(String),

    #[error("corrupt archive: {0}")]
    Corrupt(String),

    #[error("archive has no entries: {0}")]
    Empty(String),

    #[error("usage: {0}")]
    Usage(String),

    #[error("invalid mode '{mode}': {problem}")]
    InvalidMode { mode: String, problem: ModeProblem },

    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// A command panicked while running one line.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
