//! End-to-end tests for the diff and conflict engines.
//!
//! These tests exercise the public API only: raw text in, structured models
//! and merged text out.

use mergelens_core::conflict::{apply_resolutions, parse_conflicts, resolve_all};
use mergelens_core::diff::{DiffParser, Truncation};
use mergelens_core::models::{DiffLine, FileStatus, LineType, Resolution};
use mergelens_core::{parse_diff, DiffLimits, TRUNCATION_MARKER};

// ===========================================================================
// Helpers
// ===========================================================================

/// One added file with `lines` body lines of roughly 100 bytes each.
fn added_file_block(index: usize, lines: usize) -> String {
    let mut block = format!(
        "diff --git a/file{index}.txt b/file{index}.txt\nnew file mode 100644\n--- /dev/null\n+++ b/file{index}.txt\n@@ -0,0 +1,{lines} @@\n"
    );
    let filler = "x".repeat(90);
    for n in 0..lines {
        block.push_str(&format!("+{n:06} {filler}\n"));
    }
    block
}

// ===========================================================================
// Diff
// ===========================================================================

#[test]
fn single_hunk_modification() {
    let raw = "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -1,2 +1,3 @@\n a\n-b\n+b2\n+c\n";
    let files = parse_diff(raw);
    assert_eq!(files.len(), 1);

    let file = &files[0];
    assert_eq!(file.new_path, "f");
    assert_eq!(file.status, FileStatus::Modified);
    assert_eq!(file.additions, 2);
    assert_eq!(file.deletions, 1);
    assert_eq!(file.hunks.len(), 1);

    let kinds: Vec<(LineType, &str)> = file.hunks[0]
        .lines
        .iter()
        .map(|l| (l.line_type, l.content.as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (LineType::Context, "a"),
            (LineType::Deletion, "b"),
            (LineType::Addition, "b2"),
            (LineType::Addition, "c"),
        ]
    );
}

#[test]
fn totals_match_prefixed_body_lines() {
    let raw = "\
diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -4,6 +4,7 @@ pub mod config;
 use std::fmt;
-use std::io;
+use std::io::{self, Read};
+use std::path::Path;

 fn one() {}
-fn two() {}
+fn two() -> u8 { 2 }
 fn three() {}
";
    let files = parse_diff(raw);
    let file = &files[0];
    let body = &file.hunks[0].lines;

    let plus = raw.lines().skip(5).filter(|l| l.starts_with('+')).count();
    let minus = raw.lines().skip(5).filter(|l| l.starts_with('-')).count();
    assert_eq!(file.additions, plus);
    assert_eq!(file.deletions, minus);
    assert_eq!(
        body.iter().filter(|l| l.line_type == LineType::Addition).count(),
        plus
    );
    assert!(file.hunks[0].counts_match());
    for line in body {
        match line.line_type {
            LineType::Addition => {
                assert!(line.old_line_number.is_none() && line.new_line_number.is_some())
            }
            LineType::Deletion => {
                assert!(line.old_line_number.is_some() && line.new_line_number.is_none())
            }
            _ => assert!(line.old_line_number.is_some() && line.new_line_number.is_some()),
        }
    }
}

#[test]
fn oversized_diff_is_truncated_with_marker() {
    let mut raw = String::new();
    let mut index = 0;
    while raw.len() < 60_000_000 {
        raw.push_str(&added_file_block(index, 1000));
        index += 1;
    }

    let parser = DiffParser::new();
    let parsed = parser.parse_detailed(&raw);
    assert_eq!(parsed.truncation, Some(Truncation::Bytes));
    assert!(parsed.files.len() > 1);

    let (last, complete) = parsed.files.split_last().unwrap();
    for file in complete {
        assert_eq!(file.status, FileStatus::Added);
        assert_eq!(file.additions, 1000);
        assert!(file.hunks[0].counts_match());
    }

    let final_line = last.hunks.last().unwrap().lines.last().unwrap();
    assert_eq!(final_line.line_type, LineType::Context);
    assert_eq!(final_line.content, TRUNCATION_MARKER);
    assert!(final_line.is_truncation_marker());

    // The plain entry point yields the same files.
    assert_eq!(parser.parse(&raw), parsed.files);
}

#[test]
fn byte_cap_boundary() {
    let raw = added_file_block(0, 3);
    let exact = DiffParser::with_limits(DiffLimits {
        max_bytes: raw.len(),
        max_lines: 100_000,
    });
    let files = exact.parse(&raw);
    assert!(!files[0].hunks[0]
        .lines
        .iter()
        .any(DiffLine::is_truncation_marker));
    assert_eq!(files[0].additions, 3);

    let short = DiffParser::with_limits(DiffLimits {
        max_bytes: raw.len() - 1,
        max_lines: 100_000,
    });
    let files = short.parse(&raw);
    let lines = &files[0].hunks[0].lines;
    assert!(lines.last().unwrap().is_truncation_marker());
    assert_eq!(files[0].additions, 3);
}

#[tokio::test]
async fn async_parse_is_identical() {
    let raw: String = (0..5).map(|i| added_file_block(i, 20)).collect();
    let parser = DiffParser::new();

    let (a, b) = tokio::join!(parser.parse_async(raw.clone()), parser.parse_async(raw.clone()));
    let expected = parser.parse(&raw);
    assert_eq!(a.unwrap(), expected);
    assert_eq!(b.unwrap(), expected);
}

// ===========================================================================
// Conflicts
// ===========================================================================

#[test]
fn both_resolution_example() {
    let content = "<<<<<<< HEAD\nfoo\n=======\nbar\n>>>>>>> branch\n";
    let mut chunks = parse_conflicts(content);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].ours_lines, vec!["foo"]);
    assert_eq!(chunks[0].theirs_lines, vec!["bar"]);
    assert_eq!(chunks[0].base_lines, None);

    chunks[0].resolve(Resolution::Both).unwrap();
    assert_eq!(apply_resolutions(content, &chunks), "foo\nbar");
}

#[test]
fn resolving_everything_to_ours_recovers_ours_side() {
    let content = "\
fn main() {
<<<<<<< HEAD
    let x = 1;
    let y = 2;
=======
    let x = 10;
>>>>>>> feature
    println!(\"{x}\");

<<<<<<< HEAD
    done();
=======
    finish();
    cleanup();
>>>>>>> feature
}";
    let ours = "\
fn main() {
    let x = 1;
    let y = 2;
    println!(\"{x}\");

    done();
}";
    let mut chunks = parse_conflicts(content);
    assert_eq!(chunks.len(), 2);
    assert_eq!(resolve_all(&mut chunks, &Resolution::Ours).unwrap(), 2);
    assert_eq!(apply_resolutions(content, &chunks), ours);
}

#[test]
fn no_conflicts_returns_input_unchanged() {
    let content = "alpha\n\nbeta\ngamma\n";
    let chunks = parse_conflicts(content);
    assert!(chunks.is_empty());
    assert_eq!(apply_resolutions(content, &chunks), content);
}

#[test]
fn undo_restores_markers() {
    let content = "<<<<<<< HEAD\nfoo\n=======\nbar\n>>>>>>> branch";
    let mut chunks = parse_conflicts(content);
    chunks[0].resolve(Resolution::Theirs).unwrap();
    assert_eq!(apply_resolutions(content, &chunks), "bar");

    chunks[0].unresolve().unwrap();
    assert_eq!(apply_resolutions(content, &chunks), content);
}
