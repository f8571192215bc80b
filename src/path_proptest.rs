//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{
        absolute_pattern, is_dynamic_pattern, literal_root, relative_to, resolve, GlobOptions,
        PatternSet,
    };
    use proptest::prelude::*;
    use std::path::{Component, Path};

    // ============================================================================
    // is_dynamic_pattern property tests
    // ============================================================================

    proptest! {
        /// Property: plain path segments are never dynamic
        #[test]
        fn literal_paths_are_not_dynamic(path in "[a-zA-Z0-9_./-]+") {
            prop_assert!(!is_dynamic_pattern(&path));
        }

        /// Property: a star anywhere makes the path dynamic
        #[test]
        fn star_makes_path_dynamic(
            prefix in "[a-zA-Z0-9_/]*",
            suffix in "[a-zA-Z0-9_./]*",
        ) {
            let pattern = format!("{}*{}", prefix, suffix);
            prop_assert!(is_dynamic_pattern(&pattern));
        }
    }

    // ============================================================================
    // resolve property tests
    // ============================================================================

    proptest! {
        /// Property: resolve always produces an absolute path without `.` or `..`
        #[test]
        fn resolve_is_absolute_and_normal(path in "(\\.\\.?/|[a-z]{1,5}/){0,6}[a-z]{0,5}") {
            let resolved = resolve(Path::new("/base/dir"), &path);
            prop_assert!(resolved.is_absolute());
            for component in resolved.components() {
                prop_assert!(
                    !matches!(component, Component::CurDir | Component::ParentDir),
                    "unexpected component in {:?}",
                    resolved
                );
            }
        }

        /// Property: resolving an already resolved path changes nothing
        #[test]
        fn resolve_is_idempotent(path in "([a-z]{1,5}/|\\.\\./){0,6}[a-z]{1,5}") {
            let cwd = Path::new("/base/dir");
            let once = resolve(cwd, &path);
            let twice = resolve(cwd, &once);
            prop_assert_eq!(once, twice);
        }
    }

    // ============================================================================
    // relative_to property tests
    // ============================================================================

    proptest! {
        /// Property: joining a relative path back onto its root restores the target
        #[test]
        fn relative_to_round_trips(
            root in "(/[a-z]{1,4}){0,4}",
            target in "(/[a-z]{1,4}){0,4}",
        ) {
            let root = resolve(Path::new("/"), format!("/{}", root));
            let target = resolve(Path::new("/"), format!("/{}", target));
            let relative = relative_to(&root, &target);
            prop_assert_eq!(resolve(&root, &relative), target);
        }
    }

    // ============================================================================
    // PatternSet property tests
    // ============================================================================

    proptest! {
        /// Property: a literal absolute pattern matches exactly its own path
        #[test]
        fn literal_pattern_matches_itself(path in "(/[a-z0-9_]{1,8}){1,5}") {
            let set = PatternSet::new(
                std::slice::from_ref(&path),
                &GlobOptions::default(),
                Path::new("/"),
            )
            .unwrap();
            prop_assert!(set.matches(Path::new(&path)));
            let sibling = format!("{}x", path);
            prop_assert!(!set.matches(Path::new(&sibling)));
        }

        /// Property: a recursive pattern matches everything beneath its root
        #[test]
        fn recursive_pattern_matches_descendants(
            root in "(/[a-z]{1,6}){1,3}",
            rest in "(/[a-z]{1,6}){1,4}",
        ) {
            let pattern = format!("{}/**", root);
            let set = PatternSet::new(&[pattern], &GlobOptions::default(), Path::new("/"))
                .unwrap();
            let candidate = format!("{}{}", root, rest);
            prop_assert!(set.matches(Path::new(&candidate)));
        }

        /// Property: glob characters in the working directory match only themselves
        #[test]
        fn working_directory_is_matched_literally(
            cwd in "(/[a-z\\[\\]*?{},]{1,6}){1,3}",
            name in "[a-z]{1,6}\\.txt",
        ) {
            let cwd = Path::new(&cwd);
            let pattern = absolute_pattern(cwd, &name);
            prop_assert_eq!(literal_root(&pattern), cwd.join(&name));

            let set = PatternSet::new(&[pattern], &GlobOptions::default(), cwd).unwrap();
            prop_assert!(set.matches(&cwd.join(&name)));
        }
    }
}
