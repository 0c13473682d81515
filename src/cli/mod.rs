//! Command-line interface for reading-tracker.
//!
//! This module provides commands for searching the Open Library catalog,
//! enriching books, managing the local library and asking the reading
//! assistant.

mod commands;

pub use commands::{Cli, Commands, run_command};
