//! # CLI Command Implementations
//!
//! Each subcommand of the `memfs-copy` tool lives in its own file with:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An async `execute` function that takes the parsed `Args` and calls into
//!   the `memfs_copy` library.

pub mod apply;
pub mod copy;
