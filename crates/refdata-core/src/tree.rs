//! Relative paths and tree snapshots.
//!
//! A [`RelativePath`] is the join key between a generated tree and a
//! reference tree. It always uses `/` as separator so that reports and
//! comparisons are identical on every platform.

use crate::errors::RefdataError;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// A `/`-separated path relative to a tree root.
///
/// Ordering is plain string ordering, which is the ordering of every
/// snapshot and every report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Build from a `/`-separated string.
    ///
    /// Rejects empty paths, absolute paths and `.`/`..` segments.
    pub fn new(path: impl Into<String>) -> Result<Self, RefdataError> {
        let path = path.into();
        let invalid = |reason: &str| RefdataError::InvalidRelativePath {
            path: path.clone(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("path is empty"));
        }
        if path.starts_with('/') {
            return Err(invalid("path is absolute"));
        }
        if path
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..")
        {
            return Err(invalid("path contains an empty, '.' or '..' segment"));
        }
        Ok(Self(path))
    }

    /// Build from a platform path below some root.
    pub fn from_path(path: &Path) -> Result<Self, RefdataError> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => {
                    return Err(RefdataError::InvalidRelativePath {
                        path: path.display().to_string(),
                        reason: "path is not relative to its root".to_string(),
                    })
                }
            }
        }
        Self::new(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve against `root` using platform separators.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }

    /// Iterate over the path's segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The regular files below one root at one point in time.
///
/// Entries are sorted and unique. Snapshots are never mutated; walk the
/// tree again to observe changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    root: PathBuf,
    entries: Vec<RelativePath>,
}

impl TreeSnapshot {
    /// Build a snapshot, sorting and de-duplicating `entries`.
    pub fn new(root: impl Into<PathBuf>, mut entries: Vec<RelativePath>) -> Self {
        entries.sort();
        entries.dedup();
        Self {
            root: root.into(),
            entries,
        }
    }

    /// A snapshot with no entries, used for references that do not exist yet.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RelativePath] {
        &self.entries
    }

    /// Restartable iteration in path order.
    pub fn iter(&self) -> std::slice::Iter<'_, RelativePath> {
        self.entries.iter()
    }

    /// Absolute location of `path` inside this snapshot's root.
    pub fn locate(&self, path: &RelativePath) -> PathBuf {
        path.to_path(&self.root)
    }
}

impl<'a> IntoIterator for &'a TreeSnapshot {
    type Item = &'a RelativePath;
    type IntoIter = std::slice::Iter<'a, RelativePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
