//! Template copy
//!
//! [`Editor::copy_tpl_async`] is [`Editor::copy_async`] with a content
//! transform that renders placeholders. Binary files never reach the
//! renderer: their bytes are copied unchanged.

use super::{CopyOptions, CopyResult, FileContents, ProcessFileFn};
use crate::binary::is_binary;
use crate::editor::Editor;
use crate::error::Result;
use crate::filesystem::Store;
use crate::path::SourceSpec;
use crate::template::{render_bytes, strip_suffix, TemplateContext, TemplateSettings};
use futures::future::BoxFuture;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Content transform rendering text files and passing binary files through
pub fn template_processor(context: TemplateContext, settings: TemplateSettings) -> ProcessFileFn {
    let context = Arc::new(context);
    let settings = Arc::new(settings);

    Arc::new(
        move |path: PathBuf, contents: Vec<u8>| -> BoxFuture<'static, Result<FileContents>> {
            let context = Arc::clone(&context);
            let settings = Arc::clone(&settings);
            Box::pin(async move {
                if is_binary(&path, Some(&contents)) {
                    debug!("{} is binary, copying verbatim", path.display());
                    return Ok(FileContents::Bytes(contents));
                }
                render_bytes(&path, &contents, &context, &settings).map(FileContents::Text)
            })
        },
    )
}

impl<S: Store> Editor<S> {
    /// Copy files, rendering their contents and destination paths
    ///
    /// Unless `options` supplies its own `process_destination_path`, the
    /// template suffix from `settings` is stripped from each destination in
    /// multi-file mode. A `process` hook in `options` runs after rendering.
    pub async fn copy_tpl_async(
        &self,
        from: impl Into<SourceSpec>,
        to: Option<&Path>,
        context: Option<&TemplateContext>,
        settings: Option<&TemplateSettings>,
        options: Option<&CopyOptions>,
    ) -> Result<Option<Vec<CopyResult>>> {
        let context = context.cloned().unwrap_or_default();
        let settings = settings.cloned().unwrap_or_default();
        let mut options = options.cloned().unwrap_or_default();

        if options.process_destination_path.is_none() {
            let suffix = settings.suffix.clone();
            options = options.with_destination_path(move |path| strip_suffix(path, &suffix));
        }
        options.process_file = Some(template_processor(context.clone(), settings.clone()));

        self.copy_async(from, to, &options, Some(&context), Some(&settings))
            .await
    }
}
