//! Apply command implementation
//!
//! Parses a copy plan and runs its operations in order against one overlay,
//! then commits the overlay unless `--dry-run` is given.

use anyhow::Result;
use clap::Args;
use memfs_copy::config::from_file;
use memfs_copy::plan;
use std::path::PathBuf;
use std::time::Instant;

/// Default plan file name
pub const DEFAULT_PLAN: &str = ".memfs-copy.yaml";

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to plan file
    #[arg(short, long, value_name = "PATH", env = "MEMFS_COPY_PLAN")]
    pub plan: Option<PathBuf>,

    /// Directory relative paths are resolved against (defaults to current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the apply command
pub async fn execute(args: ApplyArgs) -> Result<()> {
    let start_time = Instant::now();

    let cwd = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    // Relative plan paths follow the working directory
    let plan_path = cwd.join(args.plan.unwrap_or_else(|| PathBuf::from(DEFAULT_PLAN)));
    if !plan_path.is_file() {
        anyhow::bail!("Plan file not found: {}", plan_path.display());
    }

    let operations = from_file(&plan_path)?;
    let report = plan::run(&operations, &cwd, args.dry_run).await?;

    if !report.results.is_empty() {
        super::copy::print_contents(&report.results)?;
    }

    if args.quiet {
        return Ok(());
    }

    if args.dry_run {
        for path in &report.staged {
            println!("would write {}", path.display());
        }
    } else {
        for path in &report.written {
            println!("wrote {}", path.display());
        }
    }
    println!(
        "{} operation(s) applied in {:.2}s",
        operations.len(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
