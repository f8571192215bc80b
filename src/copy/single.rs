//! Single-file copy execution
//!
//! The only place file contents are transformed. Both entry points end the
//! same way: return the contents when there is no destination, append when
//! requested and the destination is already staged, otherwise write.

use super::{CopyOptions, CopyResult};
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::filesystem::Store;
use log::debug;
use std::io::ErrorKind;
use std::path::Path;

impl<S: Store> Editor<S> {
    /// Copy one file through the `process_file` pipeline
    ///
    /// Without a `process_file` transform this is [`Editor::copy_single`].
    pub async fn copy_single_async(
        &self,
        from: &Path,
        to: Option<&Path>,
        options: &CopyOptions,
    ) -> Result<Option<CopyResult>> {
        let Some(process_file) = &options.process_file else {
            return self.copy_single(from, to, options).await;
        };

        let raw = self.read_source(from).await?;
        let mut contents = process_file(from.to_path_buf(), raw).await?.into_bytes();
        if let Some(process) = &options.process {
            contents = process(from, contents)?;
        }

        self.finish_copy(from, to, contents, options).await
    }

    /// Copy one file without the async transform
    ///
    /// The `process` hook still applies.
    pub async fn copy_single(
        &self,
        from: &Path,
        to: Option<&Path>,
        options: &CopyOptions,
    ) -> Result<Option<CopyResult>> {
        let mut contents = self.read_source(from).await?;
        if let Some(process) = &options.process {
            contents = process(from, contents)?;
        }

        self.finish_copy(from, to, contents, options).await
    }

    async fn read_source(&self, from: &Path) -> Result<Vec<u8>> {
        match self.read(from).await {
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => Err(Error::NoMatch {
                from: from.display().to_string(),
            }),
            other => other,
        }
    }

    async fn finish_copy(
        &self,
        from: &Path,
        to: Option<&Path>,
        contents: Vec<u8>,
        options: &CopyOptions,
    ) -> Result<Option<CopyResult>> {
        let Some(to) = to else {
            return Ok(Some(CopyResult {
                path: from.to_path_buf(),
                contents,
            }));
        };

        if options.append {
            if !self.supports_append()? {
                return Err(Error::append_unsupported());
            }
            if self.exists_in_memory(to)? {
                debug!("append {} -> {}", from.display(), to.display());
                self.append(to, &contents, &options.append_options)?;
                return Ok(None);
            }
        }

        let metadata = self.metadata(from).await?;
        debug!("copy {} -> {}", from.display(), to.display());
        self.write(to, contents, metadata.as_ref())?;
        Ok(None)
    }
}
