//! Disk and overlay match reconciliation
//!
//! A file can exist on disk, in the overlay, or both. Every path yields at
//! most one copy: disk matches come first, and an overlay entry whose path
//! is already among them is dropped.

use crate::error::Result;
use crate::filesystem::Store;
use crate::path::PatternSet;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Where a matched file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Disk,
    Overlay,
}

/// A file selected for copying
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub path: PathBuf,
    pub origin: Origin,
}

/// Overlay entries matching `patterns` that are not among `disk`
///
/// Entries whose own key looks like a glob below the pattern roots are
/// skipped; they are not real files. Order follows the store traversal.
pub fn overlay_matches<S: Store + ?Sized>(
    store: &S,
    patterns: &PatternSet,
    disk: &[PathBuf],
) -> Vec<PathBuf> {
    let disk: HashSet<&Path> = disk.iter().map(PathBuf::as_path).collect();

    store
        .paths()
        .filter(|path| patterns.matches(path) && !patterns.is_glob_like(path))
        .filter(|path| !disk.contains(path))
        .map(Path::to_path_buf)
        .collect()
}

/// Disk and overlay matches for one copy request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    pub disk: Vec<PathBuf>,
    pub overlay: Vec<PathBuf>,
}

impl Matches {
    /// Expand `patterns` on disk and reconcile against the overlay
    pub fn collect<S: Store + ?Sized>(store: &S, patterns: &PatternSet) -> Result<Self> {
        let disk = patterns.expand()?;
        let overlay = overlay_matches(store, patterns, &disk);
        Ok(Self { disk, overlay })
    }

    /// Whether nothing matched anywhere
    pub fn is_empty(&self) -> bool {
        self.disk.is_empty() && self.overlay.is_empty()
    }

    /// Total number of matched files
    pub fn len(&self) -> usize {
        self.disk.len() + self.overlay.len()
    }

    /// All matches, disk first, each tagged with its origin
    pub fn into_files(self) -> Vec<MatchedFile> {
        let disk = self.disk.into_iter().map(|path| MatchedFile {
            path,
            origin: Origin::Disk,
        });
        let overlay = self.overlay.into_iter().map(|path| MatchedFile {
            path,
            origin: Origin::Overlay,
        });
        disk.chain(overlay).collect()
    }
}
