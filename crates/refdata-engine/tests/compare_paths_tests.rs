// Integration tests for compare_paths
// Both trees are read in place; neither side may be missing

use refdata_core::logging_facility::init_test_capture;
use refdata_core::schema::{event, op};
use refdata_core::ExErrorKind;
use refdata_engine::{compare_paths, Settings};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> (TempDir, TempDir, Settings) {
    let reference = TempDir::new().unwrap();
    let generated = TempDir::new().unwrap();
    write(reference.path(), "out/a.txt", b"one\ntwo\n");
    write(generated.path(), "out/a.txt", b"one\ntwo\n");
    let settings = Settings::for_project(reference.path());
    (reference, generated, settings)
}

#[test]
fn test_identical_trees_compare_ok() {
    // Given: Two trees with the same content
    let (reference, generated, settings) = fixture();
    write(reference.path(), "data.bin", b"\0\x01\x02");
    write(generated.path(), "data.bin", b"\0\x01\x02");

    // When / Then: The comparison succeeds
    compare_paths(reference.path(), generated.path(), &settings).unwrap();
}

#[test]
fn test_differing_trees_fail_with_report() {
    // Given: A modified text file and a generated-only file
    let (reference, generated, settings) = fixture();
    write(generated.path(), "out/a.txt", b"one\nTWO\n");
    write(generated.path(), "extra.txt", b"x\n");

    // When: We compare
    let err = compare_paths(reference.path(), generated.path(), &settings).unwrap_err();

    // Then: One mismatch carries the whole report
    assert_eq!(err.kind(), ExErrorKind::ComparisonMismatch);
    assert!(err.message().contains("1 added, 0 removed, 1 modified"));
    assert!(err.message().contains("+ extra.txt"));
    assert!(err.message().contains("+TWO"));
    assert!(err.report().is_some());
}

#[test]
fn test_missing_reference_root_is_not_found() {
    // Given: A reference root that does not exist
    let (reference, generated, settings) = fixture();
    let missing = reference.path().join("absent");

    // When: We compare against it
    let err = compare_paths(&missing, generated.path(), &settings).unwrap_err();

    // Then: Unlike assert_refdata, a missing reference is not an empty tree
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.path(), Some(missing.display().to_string().as_str()));
}

#[test]
fn test_missing_generated_root_is_not_found() {
    let (reference, generated, settings) = fixture();
    let missing = generated.path().join("absent");

    let err = compare_paths(reference.path(), &missing, &settings).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_lifecycle_events_are_emitted() {
    // Given: Capture enabled
    let capture = init_test_capture();
    let (reference, generated, settings) = fixture();

    // When: One comparison succeeds and one fails
    compare_paths(reference.path(), generated.path(), &settings).unwrap();
    let _ = compare_paths(&reference.path().join("absent"), generated.path(), &settings);

    // Then: Start, end and end_error were logged for compare_paths
    capture.assert_event_exists(op::COMPARE_PATHS, event::START);
    capture.assert_event_exists(op::COMPARE_PATHS, event::END);
    capture.assert_event_exists(op::COMPARE_PATHS, event::END_ERROR);
    assert!(
        capture.count_events(|e| {
            e.op.as_deref() == Some(op::COMPARE_PATHS)
                && e.event.as_deref() == Some(event::END)
                && e.field("files") == Some("1")
        }) >= 1
    );
}
