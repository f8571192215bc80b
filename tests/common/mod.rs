//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_file("src/a.txt", "a");
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::plans;
    pub use super::TestFixture;
}

/// Common plan YAML snippets for testing.
#[allow(dead_code)]
pub mod plans {
    /// Copy every text file under src/ into dst/.
    pub const COPY_TXT: &str = r#"
- copy:
    from: src/*.txt
    to: dst
"#;

    /// Render the templates/ tree into out/.
    pub const RENDER_TEMPLATES: &str = r#"
- template:
    from: templates
    to: out
    vars:
      NAME: fixture
"#;

    /// Two appends into the same file; the second one sees the first.
    pub const APPEND_TWICE: &str = r#"
- copy:
    from: src/a.txt
    to: log.txt
- copy:
    from: src/b.txt
    to: log.txt
    append: true
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "invalid: yaml: content:";
}

/// A temporary directory populated with source files.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// The usual source layout: `src/{a,b}.txt`, `src/nested/c.txt`.
    #[allow(dead_code)]
    pub fn with_sources(self) -> Self {
        self.with_file("src/a.txt", "a")
            .with_file("src/b.txt", "b")
            .with_file("src/nested/c.txt", "c")
    }

    /// Add a `.memfs-copy.yaml` plan with the given content.
    #[allow(dead_code)]
    pub fn with_plan(self, content: &str) -> Self {
        self.with_file(".memfs-copy.yaml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a binary file with the given path and content.
    #[allow(dead_code)]
    pub fn with_binary_file(self, path: &str, content: &[u8]) -> Self {
        self.temp_dir
            .child(path)
            .write_binary(content)
            .expect("Failed to write binary file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("memfs-copy");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("nested/test.txt", "hello");
        assert!(fixture.path().join("nested/test.txt").exists());
    }

    #[test]
    fn test_plans_are_valid_yaml() {
        for plan in [plans::COPY_TXT, plans::RENDER_TEMPLATES, plans::APPEND_TWICE] {
            serde_yaml::from_str::<serde_yaml::Value>(plan).expect("Plan should be valid YAML");
        }
    }
}
