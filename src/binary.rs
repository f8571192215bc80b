//! Binary file detection
//!
//! Binary files bypass template rendering entirely, so a false negative here
//! would corrupt a file. The check looks at the extension first and then at
//! a sample of the content.

use std::path::Path;

/// Number of leading bytes inspected
pub const SAMPLE_SIZE: usize = 8000;

const BINARY_EXTENSIONS: &[&str] = &[
    "7z", "a", "avi", "bin", "bmp", "bz2", "class", "dll", "dylib", "eot", "exe", "flac", "gif",
    "gz", "ico", "jar", "jpeg", "jpg", "lib", "mkv", "mov", "mp3", "mp4", "o", "ogg", "otf",
    "pdf", "png", "psd", "pyc", "rar", "so", "sqlite", "tar", "tif", "tiff", "ttf", "wasm",
    "wav", "webm", "webp", "woff", "woff2", "xz", "zip", "zst",
];

/// Whether a file should be treated as binary
///
/// `sample` is the start of the file content, if already loaded. Without a
/// sample only the extension is consulted.
pub fn is_binary(path: &Path, sample: Option<&[u8]>) -> bool {
    let known_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if known_extension {
        return true;
    }

    match sample {
        Some(sample) => looks_binary(&sample[..sample.len().min(SAMPLE_SIZE)]),
        None => false,
    }
}

fn looks_binary(sample: &[u8]) -> bool {
    if sample.contains(&0) {
        return true;
    }
    match std::str::from_utf8(sample) {
        Ok(_) => false,
        // The sample may cut a multi-byte character in half
        Err(e) => e.error_len().is_some(),
    }
}
