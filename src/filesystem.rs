//! In-memory overlay store for pending file writes

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Default permissions for entries written without source metadata
pub const DEFAULT_PERMISSIONS: u32 = 0o644;

/// Metadata carried from a source file to the entry written for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// Unix permission bits
    pub permissions: u32,
    /// Modification time of the source
    pub modified_time: SystemTime,
}

impl FileMetadata {
    /// Capture the metadata of an on-disk file
    pub fn from_std(metadata: &std::fs::Metadata) -> Self {
        #[cfg(unix)]
        let permissions = {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o7777
        };
        #[cfg(not(unix))]
        let permissions = if metadata.permissions().readonly() {
            0o444
        } else {
            DEFAULT_PERMISSIONS
        };

        Self {
            permissions,
            modified_time: metadata.modified().unwrap_or_else(|_| SystemTime::now()),
        }
    }
}

/// Represents a file with content and metadata
#[derive(Debug, Clone)]
pub struct File {
    /// File content as bytes
    pub content: Vec<u8>,
    /// File permissions (simplified as u32)
    pub permissions: u32,
    /// File modification time
    pub modified_time: SystemTime,
}

impl File {
    /// Create a new file with content
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            content,
            permissions: DEFAULT_PERMISSIONS,
            modified_time: SystemTime::now(),
        }
    }

    /// Create a new file from string content
    pub fn from_string(content: &str) -> Self {
        Self::new(content.as_bytes().to_vec())
    }

    /// Create a file that inherits the given metadata
    pub fn with_metadata(content: Vec<u8>, metadata: &FileMetadata) -> Self {
        Self {
            content,
            permissions: metadata.permissions,
            modified_time: metadata.modified_time,
        }
    }

    /// Metadata snapshot of this entry
    pub fn metadata(&self) -> FileMetadata {
        FileMetadata {
            permissions: self.permissions,
            modified_time: self.modified_time,
        }
    }

    /// Get file size in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// How appended content is joined to an existing entry
#[derive(Debug, Clone)]
pub struct AppendOptions {
    /// Create the entry when it does not exist yet
    pub create: bool,
    /// Strip trailing whitespace from the existing content before joining
    pub trim_end: bool,
    /// Inserted between existing and new content
    pub separator: String,
}

impl Default for AppendOptions {
    fn default() -> Self {
        Self {
            create: true,
            trim_end: true,
            separator: "\n".to_string(),
        }
    }
}

/// The overlay store consumed by the copy pipeline.
///
/// Paths are logical keys; the copy pipeline always uses absolute paths.
pub trait Store {
    /// Every logical path currently held. Each call starts a new traversal.
    fn paths(&self) -> Box<dyn Iterator<Item = &Path> + '_>;

    /// Look up an entry
    fn get(&self, path: &Path) -> Option<&File>;

    /// Whether the path is held in memory
    fn exists_in_memory(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// Create or replace an entry. Metadata, when given, is kept on the entry.
    fn write(&mut self, path: &Path, contents: Vec<u8>, metadata: Option<&FileMetadata>)
        -> Result<()>;

    /// Whether [`Store::append`] is supported
    fn supports_append(&self) -> bool {
        false
    }

    /// Append to an entry
    fn append(&mut self, path: &Path, contents: &[u8], options: &AppendOptions) -> Result<()> {
        let _ = (path, contents, options);
        Err(Error::append_unsupported())
    }
}

/// In-memory filesystem for staging writes before they reach the disk
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    /// Files stored as path -> content mapping
    files: HashMap<PathBuf, File>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a file
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, file: File) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        self.files.insert(path, file);
        Ok(())
    }

    /// Add a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) -> Result<()> {
        self.add_file(path, File::from_string(content))
    }

    /// Get a file by path
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&File> {
        self.files.get(path.as_ref())
    }

    /// Remove a file
    pub fn remove_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<File>> {
        Ok(self.files.remove(path.as_ref()))
    }

    /// Check if a file exists
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.files.contains_key(path.as_ref())
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Clear all files
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Iterate over all files as (path, file) pairs
    pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &File)> {
        self.files.iter()
    }
}

impl Store for MemoryFS {
    fn paths(&self) -> Box<dyn Iterator<Item = &Path> + '_> {
        Box::new(self.files.keys().map(PathBuf::as_path))
    }

    fn get(&self, path: &Path) -> Option<&File> {
        self.files.get(path)
    }

    fn write(
        &mut self,
        path: &Path,
        contents: Vec<u8>,
        metadata: Option<&FileMetadata>,
    ) -> Result<()> {
        let file = match (metadata, self.files.get(path)) {
            (Some(metadata), _) => File::with_metadata(contents, metadata),
            // Rewrites keep the mode of the entry they replace
            (None, Some(existing)) => File {
                content: contents,
                permissions: existing.permissions,
                modified_time: SystemTime::now(),
            },
            (None, None) => File::new(contents),
        };
        self.add_file(path, file)
    }

    fn supports_append(&self) -> bool {
        true
    }

    fn append(&mut self, path: &Path, contents: &[u8], options: &AppendOptions) -> Result<()> {
        let Some(existing) = self.files.get_mut(path) else {
            if !options.create {
                return Err(Error::Filesystem {
                    message: format!("Cannot append to missing file: {}", path.display()),
                });
            }
            return self.add_file(path, File::new(contents.to_vec()));
        };

        if options.trim_end {
            let trimmed = existing
                .content
                .iter()
                .rposition(|b| !b.is_ascii_whitespace())
                .map_or(0, |idx| idx + 1);
            existing.content.truncate(trimmed);
        }
        existing.content.extend_from_slice(options.separator.as_bytes());
        existing.content.extend_from_slice(contents);
        existing.modified_time = SystemTime::now();
        Ok(())
    }
}
