//! Integration tests for the copy pipeline
//!
//! These exercise the public library API end to end: source resolution,
//! overlay reconciliation, destination layout, content transforms and the
//! final commit to disk.

mod common;

use common::prelude::*;
use memfs_copy::copy::CopyOptions;
use memfs_copy::editor::Editor;
use memfs_copy::error::Error;
use memfs_copy::template::{strip_suffix, TemplateContext};
use std::fs;
use std::path::{Path, PathBuf};

fn echo() -> CopyOptions {
    CopyOptions::default()
        .with_process_file(|_path: PathBuf, contents: Vec<u8>| async move { Ok(contents) })
}

#[tokio::test]
async fn test_single_file_without_destination_returns_content() {
    let fixture = TestFixture::new().with_sources();
    let editor = Editor::new(fixture.path());

    for options in [CopyOptions::default(), echo()] {
        let results = editor
            .copy_async("src/a.txt", None, &options, None, None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, fixture.path().join("src/a.txt"));
        assert_eq!(results[0].contents, b"a");
    }
    assert!(editor.pending().unwrap().is_empty());
}

#[tokio::test]
async fn test_glob_list_into_existing_directory() {
    let fixture = TestFixture::new().with_sources();
    fixture.child("dst").create_dir_all().unwrap();
    let editor = Editor::new(fixture.path());

    let result = editor
        .copy_async(
            vec!["src/*.txt"],
            Some(Path::new("dst")),
            &CopyOptions::default(),
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(
        editor.pending().unwrap(),
        vec![
            fixture.path().join("dst/a.txt"),
            fixture.path().join("dst/b.txt"),
        ]
    );

    editor.commit().unwrap();
    fixture.child("dst/a.txt").assert("a");
    fixture.child("dst/b.txt").assert("b");
    fixture.child("dst/nested").assert(predicate::path::missing());
}

#[tokio::test]
async fn test_no_match_and_ignore_no_match() {
    let fixture = TestFixture::new().with_sources();
    let editor = Editor::new(fixture.path());

    let result = editor
        .copy_async("src/*.md", Some(Path::new("dst")), &CopyOptions::default(), None, None)
        .await;
    assert!(matches!(result, Err(Error::NoMatch { .. })));

    let options = CopyOptions {
        ignore_no_match: true,
        ..CopyOptions::default()
    };
    let result = editor
        .copy_async("src/*.md", Some(Path::new("dst")), &options, None, None)
        .await
        .unwrap();
    assert_eq!(result, None);
    assert!(editor.pending().unwrap().is_empty());
}

#[tokio::test]
async fn test_multi_file_into_regular_file_is_rejected() {
    let fixture = TestFixture::new().with_sources().with_file("dst.txt", "x");
    let editor = Editor::new(fixture.path());

    for from in ["src/*.txt", "src"] {
        let result = editor
            .copy_async(from, Some(Path::new("dst.txt")), &CopyOptions::default(), None, None)
            .await;
        match result {
            Err(err @ Error::InvalidDestination { .. }) => assert_eq!(
                err.to_string(),
                "When copying multiple files, provide a directory as destination"
            ),
            other => panic!("Expected InvalidDestination for {}, got {:?}", from, other),
        }
    }
}

#[tokio::test]
async fn test_repeated_copy_overwrites() {
    let fixture = TestFixture::new().with_sources();
    let editor = Editor::new(fixture.path());
    let to = Path::new("copy.txt");

    for _ in 0..2 {
        editor
            .copy_async("src/a.txt", Some(to), &CopyOptions::default(), None, None)
            .await
            .unwrap();
    }

    assert_eq!(editor.read(to).await.unwrap(), b"a");
}

#[tokio::test]
async fn test_repeated_copy_with_append_accumulates() {
    let fixture = TestFixture::new().with_sources();
    let editor = Editor::new(fixture.path());
    let to = Path::new("log.txt");
    let options = CopyOptions {
        append: true,
        ..CopyOptions::default()
    };

    for _ in 0..3 {
        editor
            .copy_async("src/a.txt", Some(to), &options, None, None)
            .await
            .unwrap();
    }

    assert_eq!(editor.read(to).await.unwrap(), b"a\na\na");
}

#[tokio::test]
async fn test_path_on_disk_and_in_overlay_is_copied_once() {
    let fixture = TestFixture::new().with_sources();
    let editor = Editor::new(fixture.path());
    editor.write("src/a.txt", b"staged".to_vec(), None).unwrap();

    let results = editor
        .copy_async("src/**/*.txt", None, &echo(), None, None)
        .await
        .unwrap()
        .unwrap();

    let a = fixture.path().join("src/a.txt");
    assert_eq!(results.iter().filter(|r| r.path == a).count(), 1);
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_overlay_keys_that_look_like_globs_are_skipped() {
    let fixture = TestFixture::new().with_sources();
    let editor = Editor::new(fixture.path());
    editor.write("src/*.txt", b"literal".to_vec(), None).unwrap();

    let results = editor
        .copy_async("src/*", None, &echo(), None, None)
        .await
        .unwrap()
        .unwrap();

    let mut paths: Vec<_> = results.into_iter().map(|r| r.path).collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![fixture.path().join("src/a.txt"), fixture.path().join("src/b.txt")]
    );
}

#[tokio::test]
async fn test_destination_suffix_rewrite() {
    let fixture = TestFixture::new().with_file("a/b.txt.ejs", "b");
    let editor = Editor::new(fixture.path());
    let options =
        CopyOptions::default().with_destination_path(|path| strip_suffix(path, ".ejs"));

    editor
        .copy_async("a/*.ejs", Some(Path::new("out")), &options, None, None)
        .await
        .unwrap();

    assert_eq!(
        editor.pending().unwrap(),
        vec![fixture.path().join("out/b.txt")]
    );
}

#[tokio::test]
async fn test_binary_through_template_is_byte_identical() {
    let bytes: Vec<u8> = (0u8..=255).collect();
    let fixture = TestFixture::new()
        .with_binary_file("assets/logo.png", &bytes)
        .with_file("assets/readme.txt", "${NAME}");
    let editor = Editor::new(fixture.path());
    let mut context = TemplateContext::new();
    context.insert("NAME".to_string(), "rendered".to_string());

    editor
        .copy_tpl_async("assets", Some(Path::new("out")), Some(&context), None, None)
        .await
        .unwrap();
    editor.commit().unwrap();

    assert_eq!(fs::read(fixture.path().join("out/logo.png")).unwrap(), bytes);
    fixture.child("out/readme.txt").assert("rendered");
}

#[tokio::test]
async fn test_staged_output_feeds_next_copy() {
    let fixture = TestFixture::new().with_file("tpl/app.conf.tmpl", "name=${NAME}");
    let editor = Editor::new(fixture.path());
    let mut context = TemplateContext::new();
    context.insert("NAME".to_string(), "demo".to_string());

    editor
        .copy_tpl_async("tpl", Some(Path::new("stage")), Some(&context), None, None)
        .await
        .unwrap();
    editor
        .copy_async("stage/*.conf", Some(Path::new("final")), &CopyOptions::default(), None, None)
        .await
        .unwrap();
    let written = editor.commit().unwrap();

    assert_eq!(written.len(), 2);
    fixture.child("final/app.conf").assert("name=demo");
}

#[tokio::test]
async fn test_glob_under_bracketed_working_directory() {
    let fixture = TestFixture::new()
        .with_file("proj[1]/src/a.txt", "a")
        .with_file("proj[1]/src/b.txt", "b");
    let cwd = fixture.path().join("proj[1]");
    let editor = Editor::new(cwd.clone());
    editor.write("staged/x.txt", b"x".to_vec(), None).unwrap();

    editor
        .copy_async("src/*.txt", Some(Path::new("out")), &CopyOptions::default(), None, None)
        .await
        .unwrap();
    editor
        .copy_async("staged/*.txt", Some(Path::new("out")), &CopyOptions::default(), None, None)
        .await
        .unwrap();

    assert_eq!(
        editor.pending().unwrap(),
        vec![
            cwd.join("out/a.txt"),
            cwd.join("out/b.txt"),
            cwd.join("out/x.txt"),
            cwd.join("staged/x.txt"),
        ]
    );
}

#[tokio::test]
async fn test_missing_literal_with_bracket_is_no_match() {
    let fixture = TestFixture::new();
    let editor = Editor::new(fixture.path());

    let result = editor
        .copy_async("notes[draft.txt", Some(Path::new("out")), &CopyOptions::default(), None, None)
        .await;

    match result {
        Err(Error::NoMatch { from }) => assert_eq!(from, "notes[draft.txt"),
        other => panic!("Expected NoMatch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_staged_literal_with_bracket_is_copied() {
    let fixture = TestFixture::new();
    let editor = Editor::new(fixture.path());
    editor.write("notes[draft.txt", b"draft".to_vec(), None).unwrap();

    editor
        .copy_async("notes[draft.txt", Some(Path::new("out.txt")), &CopyOptions::default(), None, None)
        .await
        .unwrap();

    assert_eq!(editor.read("out.txt").await.unwrap(), b"draft");
}
