//! # Copy Pipeline
//!
//! This module turns a copy request (a source path, list or glob plus a
//! destination) into concrete single-file copies against the hybrid storage
//! of an [`Editor`](crate::editor::Editor): files on disk and files that only
//! live in the overlay store.
//!
//! ## Stages
//!
//! 1.  **Resolve** (`resolve`): classify the source once, as either a single
//!     concrete file on disk or a set of glob patterns.
//! 2.  **Reconcile** (`reconcile`): expand the patterns on disk and collect
//!     the overlay-only entries matching them. Disk matches win when a path
//!     is in both.
//! 3.  **Destination** (`destination`): compute where each matched file
//!     goes, laid out relative to the common root of the source patterns.
//! 4.  **Single copy** (`single`): read, transform and write one file, or
//!     return its content when there is no destination.
//! 5.  **Orchestrate** (`orchestrator`): run every single copy of the batch
//!     concurrently and gather their results.
//!
//! `template` layers placeholder rendering on top of the same pipeline.

pub mod destination;
pub mod orchestrator;
pub mod reconcile;
pub mod resolve;
pub mod single;
pub mod template;

use crate::error::Result;
use crate::filesystem::AppendOptions;
use crate::path::GlobOptions;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output of a content transform, text or raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    Text(String),
    Bytes(Vec<u8>),
}

impl FileContents {
    /// Coerce to bytes
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            FileContents::Text(text) => text.into_bytes(),
            FileContents::Bytes(bytes) => bytes,
        }
    }
}

impl From<String> for FileContents {
    fn from(value: String) -> Self {
        FileContents::Text(value)
    }
}

impl From<&str> for FileContents {
    fn from(value: &str) -> Self {
        FileContents::Text(value.to_string())
    }
}

impl From<Vec<u8>> for FileContents {
    fn from(value: Vec<u8>) -> Self {
        FileContents::Bytes(value)
    }
}

/// A copy that surfaced content instead of writing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyResult {
    /// The source file
    pub path: PathBuf,
    /// Processed contents
    pub contents: Vec<u8>,
}

/// Async content transform: receives the source path and its raw bytes
pub type ProcessFileFn =
    Arc<dyn Fn(PathBuf, Vec<u8>) -> BoxFuture<'static, Result<FileContents>> + Send + Sync>;

/// Synchronous post-processing of already transformed contents
pub type ProcessFn = Arc<dyn Fn(&Path, Vec<u8>) -> Result<Vec<u8>> + Send + Sync>;

/// Rewrite applied to each computed destination in multi-file mode
pub type DestinationFn = Arc<dyn Fn(PathBuf) -> PathBuf + Send + Sync>;

/// Options recognized by [`Editor::copy_async`](crate::editor::Editor::copy_async)
#[derive(Clone, Default)]
pub struct CopyOptions {
    /// Passed to the glob engine and the overlay matcher
    pub glob_options: GlobOptions,
    /// Rewrite of per-file destinations in multi-file mode
    pub process_destination_path: Option<DestinationFn>,
    /// Resolve without error when nothing matches
    pub ignore_no_match: bool,
    /// Append to destinations already held in the overlay
    pub append: bool,
    /// How appended content is joined
    pub append_options: AppendOptions,
    /// Async content transform
    pub process_file: Option<ProcessFileFn>,
    /// Post-processing hook run after `process_file`, or on raw contents
    pub process: Option<ProcessFn>,
}

impl CopyOptions {
    /// Set the async content transform
    pub fn with_process_file<F, Fut, T>(mut self, f: F) -> Self
    where
        F: Fn(PathBuf, Vec<u8>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Into<FileContents> + Send + 'static,
    {
        self.process_file = Some(Arc::new(
            move |path: PathBuf, contents: Vec<u8>| -> BoxFuture<'static, Result<FileContents>> {
                let fut = f(path, contents);
                Box::pin(async move { fut.await.map(Into::into) })
            },
        ));
        self
    }

    /// Set the post-processing hook
    pub fn with_process<F>(mut self, f: F) -> Self
    where
        F: Fn(&Path, Vec<u8>) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.process = Some(Arc::new(f));
        self
    }

    /// Set the destination rewrite
    pub fn with_destination_path<F>(mut self, f: F) -> Self
    where
        F: Fn(PathBuf) -> PathBuf + Send + Sync + 'static,
    {
        self.process_destination_path = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("glob_options", &self.glob_options)
            .field(
                "process_destination_path",
                &self.process_destination_path.is_some(),
            )
            .field("ignore_no_match", &self.ignore_no_match)
            .field("append", &self.append)
            .field("append_options", &self.append_options)
            .field("process_file", &self.process_file.is_some())
            .field("process", &self.process.is_some())
            .finish()
    }
}
