//! Stage-then-swap replacement of a directory tree
//!
//! The new tree is built in a staging directory next to the target, then
//! moved into place with renames. An interrupted update leaves either the
//! old tree or the new one, never a mix.

use crate::errors::{io_error, Result};
use std::fs;
use std::io;
use std::path::Path;

const STAGE_PREFIX: &str = ".refdata-stage-";

/// Replace the directory `target` with a tree built by `populate`.
///
/// `populate` receives an empty directory on the same filesystem as
/// `target`. If it fails, `target` is left untouched and the staging
/// directory is removed.
///
/// # Errors
///
/// Returns the error of `populate`, or an `Io` / `PermissionDenied` error if
/// staging or either rename fails. A failed final rename restores the
/// previous tree before returning. If the restore fails too, the staging
/// directory holding the previous tree is kept and named in the error.
pub fn stage_then_swap<F>(target: &Path, populate: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    swap_with(target, populate, |from, to| fs::rename(from, to))
}

fn swap_with<F, R>(target: &Path, populate: F, rename: R) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
    R: Fn(&Path, &Path) -> io::Result<()>,
{
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| io_error("create_reference_parent", parent, e))?;

    let staging = tempfile::Builder::new()
        .prefix(STAGE_PREFIX)
        .tempdir_in(parent)
        .map_err(|e| io_error("create_staging", parent, e))?;

    let tree = staging.path().join("tree");
    fs::create_dir(&tree).map_err(|e| io_error("create_staging", &tree, e))?;
    populate(&tree)?;

    let previous = staging.path().join("previous");
    let had_previous = fs::symlink_metadata(target).is_ok();
    if had_previous {
        rename(target, &previous).map_err(|e| io_error("retire_reference", target, e))?;
    }

    if let Err(e) = rename(&tree, target) {
        let reason = e.to_string();
        let err = io_error("swap_reference", target, e);
        if had_previous {
            if let Err(restore) = rename(&previous, target) {
                // Dropping the TempDir would delete the only copy of the old tree.
                let kept = staging.into_path();
                tracing::error!(
                    path = %target.display(),
                    kept = %kept.display(),
                    err = %restore,
                    "failed to restore previous reference tree"
                );
                return Err(err.with_message(format!(
                    "{}; restore failed ({}), previous tree kept at {}",
                    reason,
                    restore,
                    kept.join("previous").display()
                )));
            }
        }
        return Err(err);
    }

    if let Err(e) = staging.close() {
        tracing::warn!(err = %e, "failed to remove staging directory");
    }
    tracing::debug!(path = %target.display(), replaced = had_previous, "swapped tree");
    Ok(())
}
