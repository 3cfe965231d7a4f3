//! Direct comparison of two trees with boundary logging.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for comparisons:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure, including a mismatch
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

#![allow(clippy::result_large_err)]

use crate::settings::Settings;
use refdata_core::report::ComparisonReport;
use refdata_core::schema::op;
use refdata_core::{log_op_end, log_op_error, log_op_start};
use refdata_store::errors::Result;
use refdata_store::{diff_snapshots, walk, MissingRoot, WalkOptions};
use std::path::Path;

/// Compare `generated_root` against `reference_root`.
///
/// Nothing is staged or updated: both trees are read in place, with the
/// configured excludes and comparison options.
///
/// ## Errors
///
/// - `NotFound`: either root is missing
/// - `ComparisonMismatch`: the trees differ; the message is the full report
/// - `Io` / `PermissionDenied`: a file could not be read
pub fn compare_paths(
    reference_root: &Path,
    generated_root: &Path,
    settings: &Settings,
) -> Result<()> {
    log_op_start!(
        op::COMPARE_PATHS,
        reference_root = %reference_root.display(),
        generated_root = %generated_root.display()
    );
    let start = std::time::Instant::now();

    let files = compare_paths_impl(reference_root, generated_root, settings).map_err(|e| {
        log_op_error!(
            op::COMPARE_PATHS,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        op::COMPARE_PATHS,
        duration_ms = start.elapsed().as_millis() as u64,
        files = files
    );

    Ok(())
}

fn compare_paths_impl(
    reference_root: &Path,
    generated_root: &Path,
    settings: &Settings,
) -> Result<usize> {
    let opts = WalkOptions::new(settings.exclude_set(&[])?, MissingRoot::Error);
    let reference = walk(reference_root, &opts)?;
    let generated = walk(generated_root, &opts)?;

    let entries = diff_snapshots(&generated, &reference, &settings.compare_options())?;
    let files = entries.len();
    ComparisonReport::new(reference_root, generated_root, entries).into_result()?;
    Ok(files)
}
