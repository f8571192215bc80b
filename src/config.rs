//! # Copy Plan Schema and Parsing
//!
//! This module defines the data structures behind a `.memfs-copy.yaml` plan
//! and the logic for parsing it. A plan is a list of operations executed in
//! order against one editor (see [`crate::plan`]).
//!
//! ## Key Components
//!
//! - **`Plan`**: A type alias for `Vec<Operation>`.
//! - **`Operation`**: Either a plain `copy` or a `template` copy.
//! - **`CopyOp` / `TemplateOp`**: The parameters of each operation.
//!
//! ## Parsing
//!
//! [`parse`] accepts two formats:
//!
//! 1.  **Full format**: every operation is a mapping with its parameters.
//!
//!     ```yaml
//!     - copy:
//!         from: ["src/*.txt"]
//!         to: dst
//!     ```
//!
//! 2.  **Shorthand**: an operation whose value is just the source, for
//!     content-only copies.
//!
//!     ```yaml
//!     - copy: src/*.txt
//!     ```
//!
//! The full format is tried first. If it fails, each operation is converted
//! one by one so that the error names the offending entry.

use crate::copy::CopyOptions;
use crate::error::{Error, Result};
use crate::path::{GlobOptions, SourceSpec};
use crate::template::{TemplateContext, TemplateSettings, DEFAULT_TEMPLATE_SUFFIX};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

/// Plain copy operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyOp {
    /// A path, a glob or a list of them
    pub from: SourceSpec,
    /// Destination; content-only when absent
    #[serde(default)]
    pub to: Option<String>,
    /// Do not fail when nothing matches
    #[serde(default)]
    pub ignore_no_match: bool,
    /// Append to destinations already staged in the overlay
    #[serde(default)]
    pub append: bool,
    /// Glob engine options
    #[serde(default)]
    pub glob: GlobOptions,
}

impl CopyOp {
    /// Content-only copy of `from`
    pub fn new(from: impl Into<SourceSpec>) -> Self {
        Self {
            from: from.into(),
            to: None,
            ignore_no_match: false,
            append: false,
            glob: GlobOptions::default(),
        }
    }

    /// The equivalent copy options
    pub fn options(&self) -> CopyOptions {
        CopyOptions {
            glob_options: self.glob.clone(),
            ignore_no_match: self.ignore_no_match,
            append: self.append,
            ..CopyOptions::default()
        }
    }
}

/// Template copy operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateOp {
    /// A path, a glob or a list of them
    pub from: SourceSpec,
    /// Destination; content-only when absent
    #[serde(default)]
    pub to: Option<String>,
    /// Variables available to `${NAME}` placeholders
    #[serde(default)]
    pub vars: TemplateContext,
    /// Fail on placeholders without a value or fallback
    #[serde(default)]
    pub strict: bool,
    /// Suffix stripped from destinations
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Do not fail when nothing matches
    #[serde(default)]
    pub ignore_no_match: bool,
    /// Glob engine options
    #[serde(default)]
    pub glob: GlobOptions,
}

/// The template suffix used when a plan does not set one
///
/// # Examples
///
/// ```
/// use memfs_copy::config::default_suffix;
///
/// assert_eq!(default_suffix(), ".tmpl");
/// ```
pub fn default_suffix() -> String {
    DEFAULT_TEMPLATE_SUFFIX.to_string()
}

impl TemplateOp {
    /// Content-only template copy of `from` with no variables
    pub fn new(from: impl Into<SourceSpec>) -> Self {
        Self {
            from: from.into(),
            to: None,
            vars: TemplateContext::new(),
            strict: false,
            suffix: default_suffix(),
            ignore_no_match: false,
            glob: GlobOptions::default(),
        }
    }

    /// The equivalent engine settings
    pub fn settings(&self) -> TemplateSettings {
        TemplateSettings {
            strict: self.strict,
            suffix: self.suffix.clone(),
        }
    }

    /// The equivalent copy options
    pub fn options(&self) -> CopyOptions {
        CopyOptions {
            glob_options: self.glob.clone(),
            ignore_no_match: self.ignore_no_match,
            ..CopyOptions::default()
        }
    }
}

/// All operation types of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operation {
    /// Copy files as they are
    Copy { copy: CopyOp },
    /// Copy files, rendering placeholders in contents and destinations
    Template { template: TemplateOp },
}

impl Operation {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Copy { .. } => "copy",
            Operation::Template { .. } => "template",
        }
    }
}

/// A complete plan: operations run in the order they are listed
pub type Plan = Vec<Operation>;

/// Parses a YAML string into a `Plan`
///
/// An empty document is an empty plan.
pub fn parse(yaml_content: &str) -> Result<Plan> {
    if yaml_content.trim().is_empty() {
        return Ok(Plan::new());
    }

    match serde_yaml::from_str::<Plan>(yaml_content) {
        Ok(plan) => Ok(plan),
        Err(_) => parse_shorthand(yaml_content),
    }
}

/// Parse a plan entry by entry, accepting the shorthand forms
pub fn parse_shorthand(yaml_content: &str) -> Result<Plan> {
    let raw_values: Vec<Value> =
        serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: Some("A plan is a YAML list of operations".to_string()),
        })?;

    raw_values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Mapping(map) => convert_yaml_mapping_to_operation(index, map),
            _ => Err(Error::ConfigParse {
                message: format!("Operation {} is not a mapping", index + 1),
                hint: Some("Write each operation as `- copy: ...` or `- template: ...`".to_string()),
            }),
        })
        .collect()
}

/// Convert one `{kind: value}` mapping to an operation
fn convert_yaml_mapping_to_operation(index: usize, map: serde_yaml::Mapping) -> Result<Operation> {
    if map.len() != 1 {
        return Err(Error::ConfigParse {
            message: format!(
                "Operation {} has {} keys, expected exactly one",
                index + 1,
                map.len()
            ),
            hint: Some("Start a new list item for each operation".to_string()),
        });
    }

    let Some((key, value)) = map.into_iter().next() else {
        return Err(Error::ConfigParse {
            message: format!("Operation {} is empty", index + 1),
            hint: None,
        });
    };

    let op_type = key.as_str().ok_or_else(|| Error::ConfigParse {
        message: format!("Operation {} key must be a string", index + 1),
        hint: None,
    })?;

    match op_type {
        "copy" => {
            let copy = match source_shorthand(&value) {
                Some(from) => CopyOp::new(from),
                None => from_value(index, op_type, value)?,
            };
            Ok(Operation::Copy { copy })
        }
        "template" => {
            let template = match source_shorthand(&value) {
                Some(from) => TemplateOp::new(from),
                None => from_value(index, op_type, value)?,
            };
            Ok(Operation::Template { template })
        }
        _ => Err(Error::ConfigParse {
            message: format!("Unknown operation type: {}", op_type),
            hint: Some("Supported operations are `copy` and `template`".to_string()),
        }),
    }
}

/// A bare string or list of strings in place of the operation body
fn source_shorthand(value: &Value) -> Option<SourceSpec> {
    match value {
        Value::String(_) | Value::Sequence(_) => serde_yaml::from_value(value.clone()).ok(),
        _ => None,
    }
}

fn from_value<T: serde::de::DeserializeOwned>(index: usize, op_type: &str, value: Value) -> Result<T> {
    serde_yaml::from_value(value).map_err(|e| Error::ConfigParse {
        message: format!("Invalid {} operation {}: {}", op_type, index + 1, e),
        hint: Some(format!("A {} operation needs at least a `from` field", op_type)),
    })
}

/// Read and parse a plan file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Plan> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
