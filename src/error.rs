//! # Error Handling
//!
//! This module defines the centralized error type for `memfs-copy`. It uses
//! the `thiserror` library to build a single `Error` enum covering every
//! failure the copy pipeline can surface, so callers of
//! [`Editor::copy_async`](crate::editor::Editor::copy_async) only ever match
//! on one type.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. The three copy preconditions have their own
//!   variants:
//!   - `InvalidDestination`: a multi-file copy targets something that is not
//!     a directory.
//!   - `NoMatch`: nothing on disk or in the overlay matched the source.
//!   - `UnsupportedOperation`: append was requested against a store without
//!     append support.
//!
//!   Everything else (I/O, glob syntax, template rendering, plan parsing) is
//!   propagated unmodified from the collaborator that raised it.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! No partial-failure aggregation happens anywhere: the first error aborts
//! the whole batch and writes already applied to the overlay are kept.

use thiserror::Error;

/// Main error type for memfs-copy operations
#[derive(Error, Debug)]
pub enum Error {
    /// A multi-file copy was pointed at an existing path that is not a
    /// directory.
    #[error("When copying multiple files, provide a directory as destination")]
    InvalidDestination {
        /// The offending destination
        to: String,
    },

    /// The source matched nothing on disk or in the overlay store.
    #[error("Trying to copy from a source that does not exist: {from}")]
    NoMatch { from: String },

    /// The store cannot perform the requested operation.
    #[error("{message}")]
    UnsupportedOperation { message: String },

    /// An error occurred while parsing a copy plan.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the plan
        hint: Option<String>,
    },

    /// An error occurred with an overlay store or commit operation.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An error occurred with a path-related operation.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// An error occurred during template rendering.
    ///
    /// May include the name of the problematic variable when applicable.
    #[error("Template processing error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The template variable that caused the error, if applicable
        variable: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `globset::Error`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    /// The overlay store mutex was poisoned by a panicking holder.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

impl Error {
    /// The error raised when append is requested on a store lacking it.
    pub fn append_unsupported() -> Self {
        Error::UnsupportedOperation {
            message: "Current mem-fs is not compatible with append".to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
