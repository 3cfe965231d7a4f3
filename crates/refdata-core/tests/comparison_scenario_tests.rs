#![allow(clippy::unwrap_used, clippy::expect_used)]

use refdata_core::diff::{
    compare_contents, CompareOptions, ContentDiff, LineTag, PathChange, PathDiff, Strictness,
};
use refdata_core::{reconcile, ComparisonReport, ExErrorKind, RelativePath, Side, TreeSnapshot};
use std::path::Path;

fn snapshot(root: &str, paths: &[&str]) -> TreeSnapshot {
    TreeSnapshot::new(
        root,
        paths
            .iter()
            .map(|p| RelativePath::new(*p).unwrap())
            .collect(),
    )
}

#[test]
fn test_scenario_inserted_line_has_preceding_context() {
    let change = compare_contents(b"hello\nworld\n", b"hello\n", &CompareOptions::default());

    let PathChange::Modified(ContentDiff::Text { diff }) = change else {
        panic!("expected text modification");
    };
    assert_eq!(diff.hunks.len(), 1);
    assert_eq!(diff.change_counts(), (1, 0));
    let lines = &diff.hunks[0].lines;
    assert_eq!(lines[0].tag, LineTag::Context);
    assert_eq!(lines[0].text, "hello");
    assert_eq!(lines[1].tag, LineTag::Inserted);
    assert_eq!(lines[1].text, "world");
}

#[test]
fn test_scenario_removed_and_added_binaries_fail_together() {
    let generated = snapshot("/gen", &["new.bin"]);
    let reference = snapshot("/ref", &["old.bin"]);

    let entries: Vec<PathDiff> = reconcile(&generated, &reference)
        .into_iter()
        .map(|pairing| PathDiff {
            path: pairing.path,
            change: match pairing.side {
                Side::GeneratedOnly => PathChange::Added,
                Side::ReferenceOnly => PathChange::Removed,
                Side::Both => unreachable!("no shared paths"),
            },
        })
        .collect();

    let report = ComparisonReport::new(Path::new("/ref"), Path::new("/gen"), entries);
    assert!(report.has_failures());

    let err = report.into_result().unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ComparisonMismatch);
    let text = err.message();
    assert!(text.contains("+ new.bin"));
    assert!(text.contains("- old.bin"));
}

#[test]
fn test_scenario_trailing_newline_strictness() {
    let reference = b"line one\nline two";
    let generated = b"line one\nline two\n";

    let strict = CompareOptions {
        strictness: Strictness::Strict,
        ..CompareOptions::default()
    };
    let lenient = CompareOptions {
        strictness: Strictness::Lenient,
        ..CompareOptions::default()
    };

    assert!(matches!(
        compare_contents(generated, reference, &strict),
        PathChange::Modified(ContentDiff::Text { .. })
    ));
    assert_eq!(
        compare_contents(generated, reference, &lenient),
        PathChange::Unchanged
    );
}

#[test]
fn test_identical_snapshots_reconcile_to_both() {
    let generated = snapshot("/gen", &["a", "d/e", "d/f"]);
    let reference = snapshot("/ref", &["a", "d/e", "d/f"]);

    let pairings = reconcile(&generated, &reference);
    assert_eq!(pairings.len(), 3);
    assert!(pairings.iter().all(|p| p.side == Side::Both));
}
