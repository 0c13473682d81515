//! Reading Tracker - a personal reading log backed by Open Library.
//!
//! Books can be looked up in the public catalog, enriched without losing
//! anything the user typed, stored in a local SQLite library, summarised per
//! year and discussed with a chat assistant. Everything is driven from the
//! command line.

pub mod catalog;
pub mod chat;
pub mod cli;
pub mod config;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod library;
pub mod model;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so --json output stays clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("reading_tracker=info".parse()?))
        .init();

    cli::run_command(&args)
}
