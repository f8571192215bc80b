//! Destination path generation
//!
//! A copy either targets one fixed destination, or lays every matched file
//! out under a destination directory relative to the common root of the
//! source patterns. Either way the result may itself be a template and is
//! rendered against the context before use.

use super::{CopyOptions, DestinationFn};
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::filesystem::Store;
use crate::path::{common_path, is_dynamic_pattern, relative_to, SourceSpec};
use crate::template::{render_path, TemplateContext, TemplateSettings};
use std::path::{Path, PathBuf};

/// How destinations are derived for one copy request
#[derive(Clone)]
pub enum DestinationPlan {
    /// Every source goes to the same place
    Fixed(Option<PathBuf>),
    /// Each source goes to `to/<path relative to root>`, then through `rewrite`
    PerFile {
        root: PathBuf,
        to: Option<PathBuf>,
        rewrite: Option<DestinationFn>,
    },
}

impl std::fmt::Debug for DestinationPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DestinationPlan::Fixed(to) => f.debug_tuple("Fixed").field(to).finish(),
            DestinationPlan::PerFile { root, to, rewrite } => f
                .debug_struct("PerFile")
                .field("root", root)
                .field("to", to)
                .field("rewrite", &rewrite.is_some())
                .finish(),
        }
    }
}

impl DestinationPlan {
    /// Destination of one source, before rendering
    pub fn destination_for(&self, source: &Path) -> Option<PathBuf> {
        match self {
            DestinationPlan::Fixed(to) => to.clone(),
            DestinationPlan::PerFile { root, to, rewrite } => {
                let to = to.as_ref()?;
                let joined = to.join(relative_to(root, source));
                Some(match rewrite {
                    Some(rewrite) => rewrite(joined),
                    None => joined,
                })
            }
        }
    }

    /// Destination of one source, rendered through the template context
    pub fn rendered_for(
        &self,
        source: &Path,
        context: Option<&TemplateContext>,
        settings: &TemplateSettings,
    ) -> Result<Option<PathBuf>> {
        render_path(self.destination_for(source), context, settings)
    }
}

impl<S: Store> Editor<S> {
    /// Whether a source spec is copied as a set of files
    ///
    /// True for lists, for paths that exist neither on disk nor in the
    /// overlay, and for glob patterns.
    pub fn is_multi_file(&self, spec: &SourceSpec) -> Result<bool> {
        match spec {
            SourceSpec::Many(_) => Ok(true),
            SourceSpec::Single(entry) => Ok(is_dynamic_pattern(entry) || !self.exists(entry)?),
        }
    }

    /// Fail unless `to` is absent, missing or an existing directory
    pub fn ensure_directory_destination(&self, to: Option<&Path>) -> Result<()> {
        let Some(to) = to else {
            return Ok(());
        };

        let invalid = || Error::InvalidDestination {
            to: to.display().to_string(),
        };
        match std::fs::metadata(to) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(invalid()),
            Err(_) if self.exists_in_memory(to)? => Err(invalid()),
            Err(_) => Ok(()),
        }
    }

    /// Choose the destination plan for a copy request
    ///
    /// `to` must already be absolute.
    pub fn destination_plan(
        &self,
        spec: &SourceSpec,
        to: Option<&Path>,
        options: &CopyOptions,
    ) -> Result<DestinationPlan> {
        if !self.is_multi_file(spec)? {
            return Ok(DestinationPlan::Fixed(to.map(Path::to_path_buf)));
        }

        self.ensure_directory_destination(to)?;
        Ok(DestinationPlan::PerFile {
            root: common_path(spec, self.cwd()),
            to: to.map(Path::to_path_buf),
            rewrite: options.process_destination_path.clone(),
        })
    }
}
