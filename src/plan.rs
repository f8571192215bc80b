//! Execution of a parsed copy plan
//!
//! Operations run one after another against a single editor, so a later
//! operation sees everything staged by the earlier ones (including files
//! that only exist in the overlay).

use crate::config::{Operation, Plan};
use crate::copy::CopyResult;
use crate::editor::Editor;
use crate::error::Result;
use crate::filesystem::{MemoryFS, Store};
use log::info;
use std::path::{Path, PathBuf};

/// Outcome of running a plan
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Content-only results, in operation order
    pub results: Vec<CopyResult>,
    /// Files written to disk; empty on a dry run
    pub written: Vec<PathBuf>,
    /// Files staged in the overlay when the plan finished
    pub staged: Vec<PathBuf>,
}

/// Run one operation
pub async fn execute_operation<S: Store>(
    editor: &Editor<S>,
    operation: &Operation,
) -> Result<Option<Vec<CopyResult>>> {
    match operation {
        Operation::Copy { copy } => {
            let to = copy.to.as_deref().map(Path::new);
            editor
                .copy_async(copy.from.clone(), to, &copy.options(), None, None)
                .await
        }
        Operation::Template { template } => {
            let to = template.to.as_deref().map(Path::new);
            editor
                .copy_tpl_async(
                    template.from.clone(),
                    to,
                    Some(&template.vars),
                    Some(&template.settings()),
                    Some(&template.options()),
                )
                .await
        }
    }
}

/// Run every operation of a plan in order
///
/// Stops at the first failing operation. Writes staged by earlier
/// operations stay in the overlay.
pub async fn execute<S: Store>(editor: &Editor<S>, plan: &[Operation]) -> Result<Vec<CopyResult>> {
    let mut results = Vec::new();

    for (index, operation) in plan.iter().enumerate() {
        info!(
            "step {}/{}: {} {}",
            index + 1,
            plan.len(),
            operation.kind(),
            source_of(operation)
        );
        if let Some(produced) = execute_operation(editor, operation).await? {
            results.extend(produced);
        }
    }

    Ok(results)
}

fn source_of(operation: &Operation) -> String {
    match operation {
        Operation::Copy { copy } => copy.from.to_string(),
        Operation::Template { template } => template.from.to_string(),
    }
}

/// Run a plan rooted at `cwd` and commit the result unless `dry_run`
pub async fn run(plan: &Plan, cwd: &Path, dry_run: bool) -> Result<Report> {
    let editor: Editor<MemoryFS> = Editor::new(cwd);
    let results = execute(&editor, plan).await?;
    let staged = editor.pending()?;

    let written = if dry_run {
        info!("dry run: {} file(s) staged, nothing written", staged.len());
        Vec::new()
    } else {
        editor.commit()?
    };

    Ok(Report {
        results,
        written,
        staged,
    })
}
