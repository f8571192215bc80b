//! Path and glob utilities for memfs-copy
//!
//! Everything here works on absolute, `/`-separated pattern strings. Relative
//! inputs are resolved against an explicit working directory instead of the
//! process one, so two editors rooted in different places never interfere.

use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// The source of a copy: one path or an ordered list, each possibly a glob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    /// A single path or pattern
    Single(String),
    /// Several paths or patterns; always treated as a multi-file copy
    Many(Vec<String>),
}

impl SourceSpec {
    /// Whether this is the list form
    pub fn is_many(&self) -> bool {
        matches!(self, SourceSpec::Many(_))
    }

    /// The raw entries, in order
    pub fn entries(&self) -> &[String] {
        match self {
            SourceSpec::Single(entry) => std::slice::from_ref(entry),
            SourceSpec::Many(entries) => entries,
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entries().join(","))
    }
}

impl From<&str> for SourceSpec {
    fn from(value: &str) -> Self {
        SourceSpec::Single(value.to_string())
    }
}

impl From<String> for SourceSpec {
    fn from(value: String) -> Self {
        SourceSpec::Single(value)
    }
}

impl From<&Path> for SourceSpec {
    fn from(value: &Path) -> Self {
        SourceSpec::Single(value.to_string_lossy().into_owned())
    }
}

impl From<&PathBuf> for SourceSpec {
    fn from(value: &PathBuf) -> Self {
        SourceSpec::from(value.as_path())
    }
}

impl From<Vec<String>> for SourceSpec {
    fn from(value: Vec<String>) -> Self {
        SourceSpec::Many(value)
    }
}

impl From<Vec<&str>> for SourceSpec {
    fn from(value: Vec<&str>) -> Self {
        SourceSpec::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SourceSpec {
    fn from(value: [&str; N]) -> Self {
        SourceSpec::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Options forwarded to the disk glob engine and the overlay matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobOptions {
    /// Let wildcards match names starting with a dot
    pub dot: bool,
    /// Case-sensitive matching
    pub case_sensitive: bool,
    /// Extra exclusion patterns, resolved against the working directory
    pub ignore: Vec<String>,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            dot: false,
            case_sensitive: true,
            ignore: Vec::new(),
        }
    }
}

/// Replace backslashes with forward slashes
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Whether a path string contains glob syntax the matcher understands
///
/// Recognizes `*`, `?`, closed bracket classes and `{a,b}` alternatives.
pub fn is_dynamic_pattern(path: &str) -> bool {
    let path = normalize_separators(path);
    let bytes = path.as_bytes();

    for (idx, &byte) in bytes.iter().enumerate() {
        match byte {
            b'*' | b'?' => return true,
            b'[' if bytes[idx + 1..].contains(&b']') => return true,
            b'{' => {
                if let Some(end) = path[idx + 1..].find('}') {
                    if path[idx + 1..idx + 1 + end].contains(',') {
                        return true;
                    }
                }
            }
            _ => {}
        }
    }

    false
}

/// Whether a stored path looks like a glob rather than a real file name
///
/// Wider than [`is_dynamic_pattern`]: `{1..3}` ranges and extglob groups
/// such as `!(x)` count too, even though they are matched literally.
pub fn looks_like_glob(path: &str) -> bool {
    if is_dynamic_pattern(path) {
        return true;
    }

    let bytes = path.as_bytes();
    bytes.iter().enumerate().any(|(idx, &byte)| match byte {
        b'{' => path[idx + 1..]
            .find('}')
            .is_some_and(|end| path[idx + 1..idx + 1 + end].contains("..")),
        b'+' | b'@' | b'!' => bytes.get(idx + 1) == Some(&b'('),
        _ => false,
    })
}

/// Resolve `path` against `cwd` and lexically normalize `.` and `..`
pub fn resolve(cwd: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Lexical path from `root` to `path`, using `..` when `path` is outside
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    let root: Vec<_> = root.components().collect();
    let target: Vec<_> = path.components().collect();
    let shared = root
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..root.len() {
        relative.push("..");
    }
    for component in &target[shared..] {
        relative.push(component.as_os_str());
    }
    relative
}

fn pattern_string(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Escape a literal name so each of its characters matches itself
fn escape_literal(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '{' | '}' => format!("[{}]", c),
            c => globset::escape(c.encode_utf8(&mut [0; 4])),
        })
        .collect()
}

/// Absolute glob for `entry`, resolved against `cwd`
///
/// The working directory and every literal component of `entry` are
/// escaped, so only the dynamic components of `entry` act as wildcards.
pub fn absolute_pattern(cwd: &Path, entry: &str) -> String {
    let normalized = normalize_separators(entry);
    let entry = Path::new(&normalized);
    let base = (!entry.is_absolute()).then_some(cwd);

    let components = base
        .into_iter()
        .flat_map(|cwd| cwd.components().map(|component| (component, true)))
        .chain(entry.components().map(|component| (component, false)));

    let mut prefix = String::new();
    let mut parts: Vec<String> = Vec::new();
    for (component, from_cwd) in components {
        match component {
            Component::Prefix(drive) => {
                prefix = pattern_string(Path::new(drive.as_os_str()));
                parts.clear();
            }
            Component::RootDir => {
                prefix.push('/');
                parts.clear();
            }
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                if from_cwd || !is_dynamic_pattern(&name) {
                    parts.push(escape_literal(&name));
                } else {
                    parts.push(name.into_owned());
                }
            }
        }
    }

    format!("{}{}", prefix, parts.join("/"))
}

fn join_recursive(pattern: &str) -> String {
    if pattern.ends_with('/') {
        format!("{}**", pattern)
    } else {
        format!("{}/**", pattern)
    }
}

/// Turn a source spec into absolute glob patterns
///
/// Dynamic entries keep their wildcards. A literal entry that is an existing
/// directory matches everything beneath it, an existing file matches only
/// itself, and a missing path matches either itself or anything beneath it
/// (the overlay may hold files there). Entries starting with `!` are
/// exclusions.
pub fn globify(spec: &SourceSpec, cwd: &Path) -> Vec<String> {
    let mut patterns = Vec::new();

    for entry in spec.entries() {
        if let Some(negated) = entry.strip_prefix('!') {
            patterns.push(format!("!{}", absolute_pattern(cwd, negated)));
            continue;
        }

        let pattern = absolute_pattern(cwd, entry);
        if is_dynamic_pattern(entry) {
            patterns.push(pattern);
            continue;
        }

        match std::fs::metadata(resolve(cwd, entry)) {
            Ok(metadata) if metadata.is_dir() => patterns.push(join_recursive(&pattern)),
            Ok(_) => patterns.push(pattern),
            Err(_) => {
                let recursive = join_recursive(&pattern);
                patterns.push(pattern);
                patterns.push(recursive);
            }
        }
    }

    patterns
}

/// The literal name a pattern component stands for, if it has no wildcard
///
/// Single-character classes such as `[*]` are how literals get escaped, so
/// they unescape to the character itself.
fn unescape_component(component: &str) -> Option<String> {
    let mut literal = String::new();
    let mut chars = component.chars();

    while let Some(c) = chars.next() {
        match c {
            '*' | '?' | '{' | '}' => return None,
            '[' => {
                let mut class = chars.clone();
                match (class.next(), class.next()) {
                    (Some(inner), Some(']')) if inner != '!' && inner != '^' => {
                        literal.push(inner);
                        chars = class;
                    }
                    _ => return None,
                }
            }
            c => literal.push(c),
        }
    }

    Some(literal)
}

/// The deepest path a pattern names literally, before its first wildcard
pub fn literal_root(pattern: &str) -> PathBuf {
    let mut root = String::new();

    for (idx, component) in pattern.split('/').enumerate() {
        let Some(literal) = unescape_component(component) else {
            break;
        };
        if idx > 0 {
            root.push('/');
        }
        root.push_str(&literal);
    }

    if root.is_empty() && pattern.starts_with('/') {
        root.push('/');
    }
    PathBuf::from(root)
}

/// The directory a single source entry is laid out from
fn entry_root(entry: &str, cwd: &Path) -> PathBuf {
    let root = literal_root(&absolute_pattern(cwd, entry));

    if is_dynamic_pattern(entry) || root.is_dir() {
        return root;
    }
    root.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf())
}

/// Longest shared ancestor of all non-exclusion entries of a source spec
pub fn common_path(spec: &SourceSpec, cwd: &Path) -> PathBuf {
    let mut roots = spec
        .entries()
        .iter()
        .filter(|entry| !entry.starts_with('!'))
        .map(|entry| entry_root(entry, cwd));

    let Some(first) = roots.next() else {
        return cwd.to_path_buf();
    };

    roots.fold(first, |common, root| {
        common
            .components()
            .zip(root.components())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.as_os_str())
            .collect()
    })
}

/// Where an include pattern starts on disk and how deep it can reach
#[derive(Debug, Clone)]
struct IncludeRoot {
    root: PathBuf,
    /// `None` when the pattern has a `**` component
    max_depth: Option<usize>,
    /// The wildcard part names a dot file explicitly
    names_dot: bool,
}

impl IncludeRoot {
    fn new(pattern: &str) -> Self {
        let dynamic: Vec<&str> = pattern
            .split('/')
            .skip_while(|component| unescape_component(component).is_some())
            .collect();

        Self {
            root: literal_root(pattern),
            max_depth: (!dynamic.iter().any(|c| c.contains("**"))).then_some(dynamic.len()),
            names_dot: dynamic.iter().any(|c| c.starts_with('.')),
        }
    }

    /// Whether `path` is visible without `dot`: no hidden name below the root
    fn allows(&self, path: &Path, dot: bool) -> bool {
        if dot || self.names_dot {
            return true;
        }
        match path.strip_prefix(&self.root) {
            Ok(relative) => !relative
                .components()
                .any(|component| component.as_os_str().to_string_lossy().starts_with('.')),
            Err(_) => true,
        }
    }
}

fn compile(pattern: &str, options: &GlobOptions) -> Result<globset::Glob> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .case_insensitive(!options.case_sensitive)
        .build()?)
}

/// A compiled set of include and exclude patterns
#[derive(Debug, Clone)]
pub struct PatternSet {
    include: GlobSet,
    roots: Vec<IncludeRoot>,
    exclude: GlobSet,
    dot: bool,
}

impl PatternSet {
    /// Compile absolute patterns (as produced by [`globify`]). Patterns
    /// starting with `!` and the `ignore` list of `options` become exclusions.
    pub fn new(patterns: &[String], options: &GlobOptions, cwd: &Path) -> Result<Self> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut roots = Vec::new();

        for raw in patterns {
            if let Some(negated) = raw.strip_prefix('!') {
                exclude.add(compile(negated, options)?);
            } else {
                include.add(compile(raw, options)?);
                roots.push(IncludeRoot::new(raw));
            }
        }
        for ignore in &options.ignore {
            let pattern = absolute_pattern(cwd, ignore.trim_start_matches('!'));
            exclude.add(compile(&pattern, options)?);
        }

        Ok(Self {
            include: include.build()?,
            roots,
            exclude: exclude.build()?,
            dot: options.dot,
        })
    }

    /// Whether a logical path matches any include and no exclude pattern
    pub fn matches(&self, path: &Path) -> bool {
        let candidate = pattern_string(path);
        if self.exclude.is_match(&candidate) {
            return false;
        }
        self.include
            .matches(&candidate)
            .into_iter()
            .any(|idx| self.roots[idx].allows(path, self.dot))
    }

    /// Whether a stored key has glob syntax below the literal pattern roots
    ///
    /// Only the part a wildcard could have matched is inspected, so brackets
    /// in the working directory never make a real file look like a glob.
    pub fn is_glob_like(&self, path: &Path) -> bool {
        let relative = self
            .roots
            .iter()
            .filter_map(|include| path.strip_prefix(&include.root).ok())
            .min_by_key(|relative| relative.components().count())
            .unwrap_or(path);
        looks_like_glob(&pattern_string(relative))
    }

    /// Expand the include patterns against the disk
    ///
    /// Walks from each pattern's literal root and returns regular files only,
    /// deduplicated, in walk order.
    pub fn expand(&self) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for include in &self.roots {
            if std::fs::metadata(&include.root).is_err() {
                continue;
            }

            let mut walker = WalkDir::new(&include.root)
                .follow_links(true)
                .sort_by_file_name();
            if let Some(depth) = include.max_depth {
                walker = walker.max_depth(depth);
            }

            for entry in walker {
                let entry = entry.map_err(|e| Error::Io(e.into()))?;
                if !entry.file_type().is_file() || !self.matches(entry.path()) {
                    continue;
                }
                if seen.insert(entry.path().to_path_buf()) {
                    files.push(entry.into_path());
                }
            }
        }

        Ok(files)
    }
}

/// Expand patterns against the disk, files only
pub fn expand(patterns: &[String], options: &GlobOptions, cwd: &Path) -> Result<Vec<PathBuf>> {
    PatternSet::new(patterns, options, cwd)?.expand()
}
