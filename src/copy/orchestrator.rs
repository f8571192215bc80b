//! The async copy entry point

use super::reconcile::{Matches, Origin};
use super::resolve::{resolve_source, ResolvedSource};
use super::{CopyOptions, CopyResult};
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::filesystem::Store;
use crate::path::{PatternSet, SourceSpec};
use crate::template::{render_path, TemplateContext, TemplateSettings};
use futures::future::try_join_all;
use log::{debug, warn};
use std::path::Path;

impl<S: Store> Editor<S> {
    /// Copy files from `from` to `to` through the overlay store
    ///
    /// `from` is a path, a list of paths or a glob. `to` is resolved against
    /// the editor's working directory; `None` returns the processed contents
    /// instead of writing anything. When several files are copied `to` must
    /// be missing or a directory, and each file is placed under it relative
    /// to the common root of the source patterns.
    ///
    /// All single-file copies of the batch run concurrently and the first
    /// failure aborts the call; writes already applied to the overlay stay.
    ///
    /// Returns the content-only results, or `None` when no copy produced
    /// content. This holds for the single-file fast path too: a plain write
    /// to `to` yields `None` rather than a one-element list, and only a
    /// content-only copy (`to` is `None`) yields `Some(vec![result])`.
    pub async fn copy_async(
        &self,
        from: impl Into<SourceSpec>,
        to: Option<&Path>,
        options: &CopyOptions,
        context: Option<&TemplateContext>,
        settings: Option<&TemplateSettings>,
    ) -> Result<Option<Vec<CopyResult>>> {
        let from = from.into();
        let to = to.map(|to| self.resolve(to));
        let settings = settings.cloned().unwrap_or_default();

        let patterns = match resolve_source(&from, self.cwd()).await {
            ResolvedSource::Concrete(file) => {
                let destination = render_path(to, context, &settings)?;
                let result = self
                    .copy_single_async(&file, destination.as_deref(), options)
                    .await?;
                return Ok(result.map(|result| vec![result]));
            }
            ResolvedSource::Pattern(patterns) => patterns,
        };

        let pattern_set = PatternSet::new(&patterns, &options.glob_options, self.cwd())?;
        let matches = {
            let store = self.lock()?;
            Matches::collect(&*store, &pattern_set)?
        };
        debug!(
            "{} matched {} disk and {} overlay file(s)",
            from,
            matches.disk.len(),
            matches.overlay.len()
        );

        let plan = self.destination_plan(&from, to.as_deref(), options)?;

        if matches.is_empty() {
            if !options.ignore_no_match {
                return Err(Error::NoMatch {
                    from: from.to_string(),
                });
            }
            warn!("nothing matched {}, skipping copy", from);
            return Ok(None);
        }

        let jobs = matches
            .into_files()
            .into_iter()
            .map(|file| {
                let destination = plan.rendered_for(&file.path, context, &settings)?;
                if file.origin == Origin::Overlay {
                    debug!("{} is only staged in memory", file.path.display());
                }
                Ok((file.path, destination))
            })
            .collect::<Result<Vec<_>>>()?;

        let results = try_join_all(jobs.iter().map(|(source, destination)| {
            self.copy_single_async(source, destination.as_deref(), options)
        }))
        .await?;

        let results: Vec<CopyResult> = results.into_iter().flatten().collect();
        if results.is_empty() {
            Ok(None)
        } else {
            Ok(Some(results))
        }
    }
}
