// Integration tests for the reference store
// Covers walking, per-path comparison and stage-then-swap updates on disk

use refdata_core::diff::{CompareOptions, PathChange};
use refdata_core::ExErrorKind;
use refdata_store::{
    diff_snapshots, walk, ExcludeSet, MissingRoot, ReferenceStore, Replacement, Stager,
    TestIdentity, WalkOptions,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn statuses(diffs: &[refdata_core::PathDiff]) -> Vec<(String, &'static str)> {
    diffs
        .iter()
        .map(|d| {
            let status = match d.change {
                PathChange::Added => "added",
                PathChange::Removed => "removed",
                PathChange::Modified(_) => "modified",
                PathChange::Unchanged => "unchanged",
            };
            (d.path.to_string(), status)
        })
        .collect()
}

#[test]
fn test_bootstrap_then_update_then_compare_clean() {
    // Given: A project without reference data and some generated output
    let project = TempDir::new().unwrap();
    let generated = TempDir::new().unwrap();
    write(generated.path(), "out/result.txt", b"42\n");

    let store = ReferenceStore::for_project(project.path());
    let reference = store
        .resolve(&TestIdentity::qualified("suite", "case1"))
        .unwrap();

    // When: We compare before any reference exists
    let staged = Stager::new().stage(generated.path()).unwrap();
    let empty = reference.snapshot(&ExcludeSet::default()).unwrap();
    let diffs = diff_snapshots(staged.snapshot(), &empty, &CompareOptions::default()).unwrap();

    // Then: Every generated file is added
    assert_eq!(statuses(&diffs), vec![("out/result.txt".to_string(), "added")]);

    // When: We update and compare again
    store.update(staged.snapshot(), &reference).unwrap();
    let stored = reference.snapshot(&ExcludeSet::default()).unwrap();
    let diffs = diff_snapshots(staged.snapshot(), &stored, &CompareOptions::default()).unwrap();

    // Then: Everything is unchanged and the layout is <project>/tests/refdata/suite.case1
    assert_eq!(
        statuses(&diffs),
        vec![("out/result.txt".to_string(), "unchanged")]
    );
    assert_eq!(
        fs::read(
            project
                .path()
                .join("tests/refdata/suite.case1/out/result.txt")
        )
        .unwrap(),
        b"42\n"
    );
}

#[test]
fn test_excluded_paths_are_invisible_on_both_sides() {
    // Given: Reference and generated trees that differ only in cache files
    let reference = TempDir::new().unwrap();
    let generated = TempDir::new().unwrap();
    write(reference.path(), "data.csv", b"a,b\n");
    write(reference.path(), ".pytest_cache/x", b"old");
    write(generated.path(), "data.csv", b"a,b\n");
    write(generated.path(), "sub/.cache", b"new");

    let opts = WalkOptions::new(ExcludeSet::defaults().unwrap(), MissingRoot::Error);

    // When: We compare with the default excludes
    let g = walk(generated.path(), &opts).unwrap();
    let r = walk(reference.path(), &opts).unwrap();
    let diffs = diff_snapshots(&g, &r, &CompareOptions::default()).unwrap();

    // Then: Only the real file is compared
    assert_eq!(statuses(&diffs), vec![("data.csv".to_string(), "unchanged")]);
}

#[test]
fn test_generated_paths_are_replaced_before_storing() {
    // Given: Output that mentions its own location
    let project = TempDir::new().unwrap();
    let generated = TempDir::new().unwrap();
    let mention = format!("file written to {}/sub/a.txt\n", generated.path().display());
    write(generated.path(), "log.txt", mention.as_bytes());

    // When: We stage with the generated-root replacement and update
    let staged = Stager::new()
        .with_replacement(Replacement::path(generated.path(), "$GEN"))
        .stage(generated.path())
        .unwrap();
    let store = ReferenceStore::for_project(project.path());
    let reference = store.resolve(&TestIdentity::named("paths")).unwrap();
    store.update(staged.snapshot(), &reference).unwrap();

    // Then: The stored reference is location independent
    assert_eq!(
        fs::read_to_string(reference.path().join("log.txt")).unwrap(),
        "file written to $GEN/sub/a.txt\n"
    );
}

#[test]
fn test_unreadable_generated_file_reports_io_error() {
    // Given: A snapshot listing a file that vanished after the walk
    let generated = TempDir::new().unwrap();
    let reference = TempDir::new().unwrap();
    write(generated.path(), "a.txt", b"a");
    write(reference.path(), "a.txt", b"a");
    let g = walk(generated.path(), &WalkOptions::default()).unwrap();
    let r = walk(reference.path(), &WalkOptions::default()).unwrap();
    fs::remove_file(generated.path().join("a.txt")).unwrap();

    // When: We compare
    let err = diff_snapshots(&g, &r, &CompareOptions::default()).unwrap_err();

    // Then: The failure names the operation and the path
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.op(), Some("read_generated"));
    assert!(err.path().unwrap().ends_with("a.txt"));
}
