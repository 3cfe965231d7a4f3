use refdata_core::errors::{ExError, ExErrorKind, RefdataError};

#[test]
fn test_generated_root_missing_verifiable_by_kind() {
    let err: ExError = RefdataError::GeneratedRootMissing {
        path: "/nowhere".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.code(), "ERR_NOT_FOUND");
    assert_eq!(err.path(), Some("/nowhere"));
}

#[test]
fn test_invalid_identity_structured_fields() {
    let err: ExError = RefdataError::InvalidIdentity {
        identity: String::new(),
        reason: "identity is empty".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.op(), Some("resolve_reference"));
    assert!(err.message().contains("identity is empty"));
}

#[test]
fn test_patch_conflict_maps_to_invalid_patch() {
    let err: ExError = RefdataError::PatchConflict {
        line: 3,
        expected: "a".to_string(),
        found: "b".to_string(),
    }
    .into();

    assert_eq!(err.kind(), ExErrorKind::InvalidPatch);
    assert!(err.message().contains("line 3"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::PermissionDenied, "ERR_PERMISSION_DENIED"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::ComparisonMismatch, "ERR_COMPARISON_MISMATCH"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidPatch, "ERR_INVALID_PATCH"),
        (ExErrorKind::Configuration, "ERR_CONFIGURATION"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_mismatch_display_is_the_report() {
    let err = ExError::new(ExErrorKind::ComparisonMismatch).with_message("Reference mismatch: ...");
    assert_eq!(
        err.to_string(),
        "[ERR_COMPARISON_MISMATCH]\nReference mismatch: ..."
    );
}
