//! CLI argument parsing and command dispatch

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// memfs-copy - Copy files through an in-memory overlay
#[derive(Parser, Debug)]
#[command(name = "memfs-copy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy files or globs, optionally rendering them as templates
    Copy(commands::copy::CopyArgs),
    /// Run the operations of a .memfs-copy.yaml plan
    Apply(commands::apply::ApplyArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        init_logging(&self.log_level)?;

        match self.command {
            Commands::Copy(args) => commands::copy::execute(args).await,
            Commands::Apply(args) => commands::apply::execute(args).await,
        }
    }
}

/// Install `env_logger` at `level`; `RUST_LOG` still refines it
fn init_logging(level: &str) -> Result<()> {
    let level: LevelFilter = level
        .parse()
        .with_context(|| format!("Invalid log level: {}", level))?;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_copy_command() {
        let cli = Cli::try_parse_from([
            "memfs-copy",
            "copy",
            "src/*.txt",
            "lib/*.txt",
            "--to",
            "out",
            "--var",
            "NAME=demo",
            "--template",
        ])
        .unwrap();

        assert_eq!(cli.log_level, "info");
        match cli.command {
            Commands::Copy(args) => {
                assert_eq!(args.from, vec!["src/*.txt", "lib/*.txt"]);
                assert_eq!(args.to.as_deref(), Some(std::path::Path::new("out")));
                assert_eq!(args.vars, vec![("NAME".to_string(), "demo".to_string())]);
                assert!(args.template);
            }
            other => panic!("Expected copy command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_log_level_after_subcommand() {
        let cli =
            Cli::try_parse_from(["memfs-copy", "apply", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(init_logging("loud").is_err());
    }
}
