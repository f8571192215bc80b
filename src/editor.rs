//! The editor: an overlay store bundled with the directory it resolves from
//!
//! All copy operations hang off [`Editor`]. It owns the store behind a mutex
//! so that the concurrently running single-file copies of one batch can
//! share it; no guard is ever held across an `.await`.

use crate::error::{Error, Result};
use crate::filesystem::{AppendOptions, FileMetadata, MemoryFS, Store};
use crate::path::resolve;
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Overlay store plus working directory
#[derive(Debug)]
pub struct Editor<S: Store = MemoryFS> {
    store: Mutex<S>,
    cwd: PathBuf,
}

impl Editor<MemoryFS> {
    /// Create an editor with an empty overlay
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::with_store(MemoryFS::new(), cwd)
    }
}

impl<S: Store> Editor<S> {
    /// Create an editor over an existing store
    ///
    /// A relative `cwd` is resolved against the process working directory.
    pub fn with_store(store: S, cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let cwd = match std::env::current_dir() {
            Ok(process_cwd) => resolve(&process_cwd, &cwd),
            Err(_) => cwd,
        };
        Self {
            store: Mutex::new(store),
            cwd,
        }
    }

    /// Directory relative inputs are resolved against
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve a path against the editor's working directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve(&self.cwd, path)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, S>> {
        self.store.lock().map_err(|_| Error::LockPoisoned {
            context: "overlay store".to_string(),
        })
    }

    /// Run a closure with shared access to the store
    pub fn inspect<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R> {
        Ok(f(&*self.lock()?))
    }

    /// Take the store back out of the editor
    pub fn into_store(self) -> Result<S> {
        self.store.into_inner().map_err(|_| Error::LockPoisoned {
            context: "overlay store".to_string(),
        })
    }

    /// Whether the path is held in the overlay
    pub fn exists_in_memory(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = self.resolve(path);
        Ok(self.lock()?.exists_in_memory(&path))
    }

    /// Whether a file exists in the overlay or on disk
    ///
    /// Directories do not count as existing files.
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = self.resolve(path);
        if self.lock()?.exists_in_memory(&path) {
            return Ok(true);
        }
        Ok(path.is_file())
    }

    /// Read a file, preferring the overlay over the disk
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = self.resolve(path);
        let in_memory = self.lock()?.get(&path).map(|file| file.content.clone());
        match in_memory {
            Some(content) => Ok(content),
            None => Ok(tokio::fs::read(&path).await?),
        }
    }

    /// Metadata of a file: the disk stat when present, else the overlay entry's
    pub async fn metadata(&self, path: impl AsRef<Path>) -> Result<Option<FileMetadata>> {
        let path = self.resolve(path);
        match tokio::fs::metadata(&path).await {
            Ok(metadata) => Ok(Some(FileMetadata::from_std(&metadata))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Ok(self.lock()?.get(&path).map(|file| file.metadata()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write a file into the overlay
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        contents: Vec<u8>,
        metadata: Option<&FileMetadata>,
    ) -> Result<()> {
        let path = self.resolve(path);
        debug!("write {} ({} bytes)", path.display(), contents.len());
        self.lock()?.write(&path, contents, metadata)
    }

    /// Whether the store can append
    pub fn supports_append(&self) -> Result<bool> {
        Ok(self.lock()?.supports_append())
    }

    /// Append to a file in the overlay
    pub fn append(
        &self,
        path: impl AsRef<Path>,
        contents: &[u8],
        options: &AppendOptions,
    ) -> Result<()> {
        let path = self.resolve(path);
        let mut store = self.lock()?;
        if !store.supports_append() {
            return Err(Error::append_unsupported());
        }
        debug!("append {} ({} bytes)", path.display(), contents.len());
        store.append(&path, contents, options)
    }
}

impl Editor<MemoryFS> {
    /// Paths waiting in the overlay, sorted
    pub fn pending(&self) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = self.lock()?.paths().map(Path::to_path_buf).collect();
        paths.sort();
        Ok(paths)
    }

    /// Flush the overlay to disk and clear it
    ///
    /// Creates parent directories as needed and applies the stored
    /// permissions on Unix-like systems. Returns the written paths, sorted.
    pub fn commit(&self) -> Result<Vec<PathBuf>> {
        let mut store = self.lock()?;
        let mut written = Vec::with_capacity(store.len());

        for (path, file) in store.files() {
            // Create parent directories if needed
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
                    message: format!("Failed to create directory '{}': {}", parent.display(), e),
                })?;
            }

            fs::write(path, &file.content).map_err(|e| Error::Filesystem {
                message: format!("Failed to write file '{}': {}", path.display(), e),
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = fs::Permissions::from_mode(file.permissions);
                fs::set_permissions(path, perms).map_err(|e| Error::Filesystem {
                    message: format!("Failed to set permissions on '{}': {}", path.display(), e),
                })?;
            }

            written.push(path.clone());
        }

        store.clear();
        written.sort();
        info!("committed {} file(s)", written.len());
        Ok(written)
    }
}
