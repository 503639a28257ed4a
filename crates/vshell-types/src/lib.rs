//! Foundation types shared by the vshell crates.
//!
//! Holds the error type every layer reports through and the session
//! configuration consumed by the front end.

pub mod config;
pub mod error;
