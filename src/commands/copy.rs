//! Copy command implementation
//!
//! Runs one copy (or template copy) through a fresh overlay, then commits
//! the overlay to disk unless `--dry-run` is given. Without `--to` the
//! processed contents are printed instead of written.

use anyhow::{Context, Result};
use clap::Args;
use memfs_copy::copy::{CopyOptions, CopyResult};
use memfs_copy::editor::Editor;
use memfs_copy::path::{GlobOptions, SourceSpec};
use memfs_copy::template::{TemplateContext, TemplateSettings};
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the copy command
#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Source paths or glob patterns; prefix with `!` to exclude
    #[arg(required = true, value_name = "FROM")]
    pub from: Vec<String>,

    /// Destination file or directory; prints contents when omitted
    #[arg(short, long, value_name = "PATH")]
    pub to: Option<PathBuf>,

    /// Directory relative paths are resolved against (defaults to current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Template variable, repeatable
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Render contents and strip the template suffix from destinations
    #[arg(long)]
    pub template: bool,

    /// Fail on placeholders without a value (with --template)
    #[arg(long)]
    pub strict: bool,

    /// Succeed when nothing matches
    #[arg(long)]
    pub ignore_no_match: bool,

    /// Append to destinations already staged by this run
    #[arg(long)]
    pub append: bool,

    /// Let wildcards match dotfiles
    #[arg(long)]
    pub dot: bool,

    /// Show what would be written without touching the disk
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Parse a `KEY=VALUE` pair
pub fn parse_var(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", raw))?;
    if key.is_empty() {
        return Err(format!("empty variable name in `{}`", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Execute the copy command
pub async fn execute(args: CopyArgs) -> Result<()> {
    let cwd = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let editor = Editor::new(&cwd);

    let from = if args.from.len() == 1 {
        SourceSpec::Single(args.from[0].clone())
    } else {
        SourceSpec::Many(args.from)
    };
    let options = CopyOptions {
        glob_options: GlobOptions {
            dot: args.dot,
            ..GlobOptions::default()
        },
        ignore_no_match: args.ignore_no_match,
        append: args.append,
        ..CopyOptions::default()
    };
    let context: TemplateContext = args.vars.into_iter().collect();
    let to = args.to.as_deref();

    let results = if args.template {
        let settings = TemplateSettings {
            strict: args.strict,
            ..TemplateSettings::default()
        };
        editor
            .copy_tpl_async(from, to, Some(&context), Some(&settings), Some(&options))
            .await?
    } else {
        editor
            .copy_async(from, to, &options, Some(&context), None)
            .await?
    };

    if let Some(results) = results {
        print_contents(&results)?;
    }

    if args.dry_run {
        for path in editor.pending()? {
            println!("would write {}", path.display());
        }
        return Ok(());
    }

    for path in editor.commit()? {
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Print content-only results; several are separated by headers
pub fn print_contents(results: &[CopyResult]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let [single] = results {
        out.write_all(&single.contents)?;
        return Ok(out.flush()?);
    }

    for result in results {
        writeln!(out, "==> {} <==", result.path.display())?;
        out.write_all(&result.contents)?;
        if !result.contents.ends_with(b"\n") {
            writeln!(out)?;
        }
    }
    Ok(out.flush()?)
}
