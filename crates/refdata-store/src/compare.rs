//! Per-path comparison of two snapshots on disk.

use crate::errors::{io_error, Result};
use refdata_core::diff::{compare_contents, CompareOptions, PathChange, PathDiff};
use refdata_core::reconcile::{reconcile, Side};
use refdata_core::tree::TreeSnapshot;
use std::fs;

/// Compare every path of the union of `generated` and `reference`.
///
/// Results come back in path order, one per path. Files present on only
/// one side are not read.
///
/// # Errors
///
/// Returns an `Io`, `NotFound` or `PermissionDenied` error if a file listed
/// in either snapshot cannot be read.
pub fn diff_snapshots(
    generated: &TreeSnapshot,
    reference: &TreeSnapshot,
    opts: &CompareOptions,
) -> Result<Vec<PathDiff>> {
    let pairings = reconcile(generated, reference);
    let mut diffs = Vec::with_capacity(pairings.len());

    for pairing in pairings {
        let change = match pairing.side {
            Side::GeneratedOnly => PathChange::Added,
            Side::ReferenceOnly => PathChange::Removed,
            Side::Both => {
                let gen_path = generated.locate(&pairing.path);
                let ref_path = reference.locate(&pairing.path);
                let gen_bytes =
                    fs::read(&gen_path).map_err(|e| io_error("read_generated", &gen_path, e))?;
                let ref_bytes =
                    fs::read(&ref_path).map_err(|e| io_error("read_reference", &ref_path, e))?;
                compare_contents(&gen_bytes, &ref_bytes, opts)
            }
        };
        let diff = PathDiff {
            path: pairing.path,
            change,
        };
        if diff.is_failure() {
            tracing::debug!(path = %diff.path, side = ?pairing.side, "path differs");
        }
        diffs.push(diff);
    }

    Ok(diffs)
}
