//! Source classification
//!
//! A copy source is classified exactly once, up front. Everything after this
//! point branches on [`ResolvedSource`] instead of re-inspecting the input.

use crate::path::{globify, resolve, SourceSpec};
use log::debug;
use std::path::{Path, PathBuf};

/// What a source spec turned out to denote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    /// A single existing regular file on disk
    Concrete(PathBuf),
    /// Absolute glob patterns to expand on disk and match in the overlay
    Pattern(Vec<String>),
}

/// The single concrete file a spec denotes, if any
///
/// Only the string form qualifies; a list never does, even with one entry.
/// A path that does not exist is simply not a concrete file.
pub async fn single_file(spec: &SourceSpec, cwd: &Path) -> Option<PathBuf> {
    let SourceSpec::Single(entry) = spec else {
        return None;
    };

    let resolved = resolve(cwd, entry);
    match tokio::fs::metadata(&resolved).await {
        Ok(metadata) if metadata.is_file() => Some(resolved),
        _ => None,
    }
}

/// Classify a source spec
pub async fn resolve_source(spec: &SourceSpec, cwd: &Path) -> ResolvedSource {
    if let Some(file) = single_file(spec, cwd).await {
        debug!("source {} is a single file", file.display());
        return ResolvedSource::Concrete(file);
    }

    let patterns = globify(spec, cwd);
    debug!("source {} expands to patterns {:?}", spec, patterns);
    ResolvedSource::Pattern(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_existing_file_is_concrete() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();

        let resolved = resolve_source(&"a.txt".into(), temp.path()).await;
        assert_eq!(resolved, ResolvedSource::Concrete(temp.path().join("a.txt")));
    }

    #[tokio::test]
    async fn test_single_element_list_is_pattern() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();

        let resolved = resolve_source(&vec!["a.txt"].into(), temp.path()).await;
        assert!(matches!(resolved, ResolvedSource::Pattern(_)));
    }

    #[tokio::test]
    async fn test_missing_path_is_pattern_not_error() {
        let temp = TempDir::new().unwrap();

        let resolved = resolve_source(&"missing.txt".into(), temp.path()).await;
        match resolved {
            ResolvedSource::Pattern(patterns) => assert_eq!(patterns.len(), 2),
            other => panic!("Expected pattern, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_directory_is_pattern() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();

        assert_eq!(single_file(&"dir".into(), temp.path()).await, None);
    }
}
