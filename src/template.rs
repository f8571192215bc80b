//! Placeholder rendering for file contents and destination paths
//!
//! Templates use shell-style placeholders:
//!
//! - `${NAME}` is replaced with the value of `NAME` from the context.
//! - `${NAME:-fallback}` uses `fallback` when `NAME` is not in the context.
//!
//! Unknown placeholders without a fallback are left untouched unless
//! [`TemplateSettings::strict`] is set, in which case rendering fails with
//! [`Error::Template`] naming the variable.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Suffix that marks a file as a template unless overridden
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".tmpl";

/// Variable name to value mapping
pub type TemplateContext = HashMap<String, String>;

/// Engine settings, passed through unchanged by the copy pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Fail on placeholders that have neither a value nor a fallback
    pub strict: bool,
    /// Suffix stripped from destination paths by the template copy
    pub suffix: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            strict: false,
            suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
        }
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("placeholder regex is valid")
    })
}

/// Render a template string
pub fn render(
    content: &str,
    context: &TemplateContext,
    settings: &TemplateSettings,
) -> Result<String> {
    let mut missing = None;

    let rendered = placeholder_regex().replace_all(content, |caps: &Captures| {
        let name = &caps[1];
        if let Some(value) = context.get(name) {
            return value.clone();
        }
        if let Some(fallback) = caps.get(2) {
            return fallback.as_str().to_string();
        }
        if settings.strict && missing.is_none() {
            missing = Some(name.to_string());
        }
        caps[0].to_string()
    });

    if let Some(variable) = missing {
        return Err(Error::Template {
            message: "Undefined variable".to_string(),
            variable: Some(variable),
        });
    }

    Ok(rendered.into_owned())
}

/// Read a file from disk and render it
pub async fn render_file(
    path: &Path,
    context: &TemplateContext,
    settings: &TemplateSettings,
) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    render_bytes(path, &bytes, context, settings)
}

/// Render raw file contents, which must be UTF-8
pub fn render_bytes(
    path: &Path,
    bytes: &[u8],
    context: &TemplateContext,
    settings: &TemplateSettings,
) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::Template {
        message: format!("{} is not valid UTF-8: {}", path.display(), e),
        variable: None,
    })?;
    render(text, context, settings)
}

/// Render a destination path. Empty or absent contexts leave it unchanged.
pub fn render_path(
    path: Option<PathBuf>,
    context: Option<&TemplateContext>,
    settings: &TemplateSettings,
) -> Result<Option<PathBuf>> {
    match (path, context) {
        (Some(path), Some(context)) if !context.is_empty() => {
            let rendered = render(&path.to_string_lossy(), context, settings)?;
            Ok(Some(PathBuf::from(rendered)))
        }
        (path, _) => Ok(path),
    }
}

/// Strip a template suffix from the end of a path
pub fn strip_suffix(path: PathBuf, suffix: &str) -> PathBuf {
    if suffix.is_empty() {
        return path;
    }
    match path.to_str().and_then(|p| p.strip_suffix(suffix)) {
        Some(stripped) => PathBuf::from(stripped),
        None => path,
    }
}
