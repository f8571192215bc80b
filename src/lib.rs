//! # memfs-copy
//!
//! This library copies files through an in-memory overlay store. Sources are
//! resolved against both the disk and the overlay, so files staged by an
//! earlier operation can be copied before anything reaches the disk. It is
//! used by the `memfs-copy` command-line tool but works as a plain library.
//!
//! ## Quick Example
//!
//! ```no_run
//! use memfs_copy::copy::CopyOptions;
//! use memfs_copy::editor::Editor;
//! use std::path::Path;
//!
//! # async fn demo() -> memfs_copy::error::Result<()> {
//! let editor = Editor::new("/work/project");
//!
//! // Stage every text file under src/ into dst/, keeping the layout
//! editor
//!     .copy_async("src/**/*.txt", Some(Path::new("dst")), &CopyOptions::default(), None, None)
//!     .await?;
//!
//! // Nothing is on disk until the overlay is committed
//! let written = editor.commit()?;
//! assert!(!written.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! - **Overlay store (`filesystem`)**: The `Store` trait and its in-memory
//!   implementation `MemoryFS`, which stages writes and appends.
//! - **Editor (`editor`)**: A store bundled with the working directory used
//!   to resolve relative inputs. Reads prefer the overlay over the disk.
//! - **Copy pipeline (`copy`)**: Source resolution, overlay reconciliation,
//!   destination generation and concurrent single-file copies.
//! - **Templates (`template`, `binary`)**: `${NAME}` placeholder rendering,
//!   skipped for binary files.
//! - **Plans (`config`, `plan`)**: A YAML list of copy and template
//!   operations executed in order.
//!
//! ## Execution Flow
//!
//! A call to `copy_async` runs these steps:
//!
//! 1.  **Resolve**: A single existing file takes the fast path; anything else
//!     becomes a list of glob patterns.
//! 2.  **Reconcile**: Patterns are expanded on disk, then overlay-only files
//!     matching them are added.
//! 3.  **Destination**: Each match gets a destination under `to`, relative to
//!     the common root of the source patterns.
//! 4.  **Copy**: All single-file copies run concurrently; the first failure
//!     aborts the call.

pub mod binary;
pub mod config;
pub mod copy;
pub mod editor;
pub mod error;
pub mod filesystem;
pub mod path;
pub mod plan;
pub mod template;

#[cfg(test)]
mod path_proptest;
