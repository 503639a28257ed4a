//! Virtual file system for vshell.
//!
//! The tree lives entirely in memory. It is built once, either from a zip
//! archive or from a fixed demo seed, and then mutated only by shell commands.

pub mod loader;
pub mod path;
pub mod seed;
pub mod store;

/// Build a store from a zip archive, or fall back to the demo seed.
pub use loader::{load_from_archive, load_from_reader, load_or_default};
/// Pure path normalization.
pub use path::{normalize, parent};
/// Fixed demo tree used when no archive is available.
pub use seed::create_default;
/// The in-memory store and its content records.
pub use store::{DEFAULT_MODE, Encoding, FileContent, VfsStore};
