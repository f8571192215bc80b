//! # memfs-copy CLI
//!
//! This is the binary entry point for the `memfs-copy` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Installing the logger.
//! - Running the selected command on a single-threaded runtime.
//!
//! The core logic lives in the library crate; the binary is a thin wrapper
//! around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute().await
}
