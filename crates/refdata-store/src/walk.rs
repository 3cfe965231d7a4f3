//! Tree walking.
//!
//! Produces a [`TreeSnapshot`] of every regular file below a root, sorted
//! by relative path. Exclude patterns are matched against each path
//! component name, so `.*cache` hides `.cache` files as well as whole
//! `.tool_cache/` directories at any depth.

use crate::errors::{io_error, walk_error, Result};
use refdata_core::errors::RefdataError;
use refdata_core::tree::{RelativePath, TreeSnapshot};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Exclude patterns applied when nothing else is configured.
pub const DEFAULT_EXCLUDES: &[&str] = &[".*cache", ".DS_Store"];

/// What to do when the root to walk does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingRoot {
    /// Fail with `NotFound`
    #[default]
    Error,
    /// Treat the tree as empty
    Empty,
}

/// Compiled glob patterns matched against path component names.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<glob::Pattern>,
}

impl ExcludeSet {
    /// Compile `patterns`; an invalid pattern is an `InvalidInput` error.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = glob::Pattern::new(pattern).map_err(|e| RefdataError::InvalidExcludePattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            })?;
            compiled.push(glob);
        }
        Ok(Self { patterns: compiled })
    }

    /// The [`DEFAULT_EXCLUDES`] set.
    pub fn defaults() -> Result<Self> {
        Self::new(DEFAULT_EXCLUDES)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if a single file or directory name is excluded.
    pub fn matches_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    /// True if any component of `path` is excluded.
    pub fn matches_path(&self, path: &RelativePath) -> bool {
        path.segments().any(|seg| self.matches_name(seg))
    }
}

/// Options of one walk.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    pub excludes: ExcludeSet,
    pub missing_root: MissingRoot,
}

impl WalkOptions {
    pub fn new(excludes: ExcludeSet, missing_root: MissingRoot) -> Self {
        Self {
            excludes,
            missing_root,
        }
    }
}

/// Snapshot the regular files below `root`.
///
/// - symlinks count only when they resolve to a regular file; dangling
///   links, sockets and fifos are skipped
/// - a `root` that is itself a file yields a one-entry snapshot rooted at
///   its parent directory
///
/// # Errors
///
/// - `NotFound` if `root` is missing and `missing_root` is `Error`
/// - `Io` / `PermissionDenied` if a directory cannot be read
pub fn walk(root: &Path, opts: &WalkOptions) -> Result<TreeSnapshot> {
    let meta = match fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return match opts.missing_root {
                MissingRoot::Empty => Ok(TreeSnapshot::empty(root)),
                MissingRoot::Error => Err(RefdataError::TreeRootMissing {
                    path: root.display().to_string(),
                }
                .into()),
            };
        }
        Err(e) => return Err(io_error("walk", root, e)),
    };

    if meta.is_file() {
        return walk_single_file(root, opts);
    }

    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !opts.excludes.matches_name(&e.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        let file_type = entry.file_type();
        let is_regular = if file_type.is_symlink() {
            fs::metadata(entry.path())
                .map(|m| m.is_file())
                .unwrap_or(false)
        } else {
            file_type.is_file()
        };
        if !is_regular {
            continue;
        }

        let rel = entry.path().strip_prefix(root).map_err(|_| {
            RefdataError::InvalidRelativePath {
                path: entry.path().display().to_string(),
                reason: format!("not below {}", root.display()),
            }
        })?;
        entries.push(RelativePath::from_path(rel)?);
    }

    let snapshot = TreeSnapshot::new(root, entries);
    tracing::debug!(
        root = %root.display(),
        entries = snapshot.len(),
        "walked tree"
    );
    Ok(snapshot)
}

fn walk_single_file(file: &Path, opts: &WalkOptions) -> Result<TreeSnapshot> {
    let parent = file.parent().unwrap_or_else(|| Path::new("."));
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let rel = RelativePath::new(name)?;

    if opts.excludes.matches_path(&rel) {
        return Ok(TreeSnapshot::empty(parent));
    }
    Ok(TreeSnapshot::new(parent, vec![rel]))
}
