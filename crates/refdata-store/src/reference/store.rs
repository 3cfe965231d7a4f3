//! Reference store: where each test keeps its expected output

use crate::errors::{io_error, Result};
use crate::reference::identity::TestIdentity;
use crate::reference::swap::stage_then_swap;
use crate::walk::{walk, ExcludeSet, MissingRoot, WalkOptions};
use refdata_core::tree::TreeSnapshot;
use std::fs;
use std::path::{Path, PathBuf};

/// Reference directory relative to a project root.
pub const REFDATA_DIR: &str = "tests/refdata";

/// Directory holding one reference tree per test identity.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    root: PathBuf,
}

impl ReferenceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store of a project: `<project_root>/tests/refdata`.
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(REFDATA_DIR))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map `identity` onto its reference root. Nothing is created.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the identity cannot be escaped.
    pub fn resolve(&self, identity: &TestIdentity) -> Result<ReferenceRoot> {
        let dir_name = identity.dir_name()?;
        Ok(ReferenceRoot {
            identity: identity.clone(),
            path: self.root.join(dir_name),
        })
    }

    /// Replace the reference tree with exactly the files of `generated`.
    ///
    /// Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a generated file cannot be read or the new
    /// tree cannot be swapped in. The old reference stays in place then.
    pub fn update(&self, generated: &TreeSnapshot, reference: &ReferenceRoot) -> Result<usize> {
        stage_then_swap(reference.path(), |tree| {
            for rel in generated {
                let src = generated.locate(rel);
                let dst = rel.to_path(tree);
                if let Some(parent) = dst.parent() {
                    fs::create_dir_all(parent)
                        .map_err(|e| io_error("create_reference_dir", parent, e))?;
                }
                fs::copy(&src, &dst).map_err(|e| io_error("copy_to_reference", &src, e))?;
            }
            Ok(())
        })?;

        tracing::debug!(
            identity = %reference.identity(),
            files = generated.len(),
            "reference updated"
        );
        Ok(generated.len())
    }
}

/// Location of one test's reference tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRoot {
    identity: TestIdentity,
    path: PathBuf,
}

impl ReferenceRoot {
    pub fn identity(&self) -> &TestIdentity {
        &self.identity
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Snapshot the reference tree. A missing tree is an empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the tree exists but cannot be walked.
    pub fn snapshot(&self, excludes: &ExcludeSet) -> Result<TreeSnapshot> {
        let opts = WalkOptions::new(excludes.clone(), MissingRoot::Empty);
        walk(&self.path, &opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdata_core::errors::ExErrorKind;
    use tempfile::TempDir;

    fn generated_tree(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_resolve_under_tests_refdata() {
        let store = ReferenceStore::for_project(Path::new("/project"));
        let root = store
            .resolve(&TestIdentity::qualified("suite", "case1"))
            .unwrap();

        assert_eq!(root.path(), Path::new("/project/tests/refdata/suite.case1"));
        assert!(!root.exists());
    }

    #[test]
    fn test_resolve_rejects_empty_identity() {
        let store = ReferenceStore::new("/refs");
        let err = store.resolve(&TestIdentity::named("")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_missing_reference_snapshots_empty() {
        let project = TempDir::new().unwrap();
        let store = ReferenceStore::for_project(project.path());
        let root = store.resolve(&TestIdentity::named("fresh")).unwrap();

        assert!(root.snapshot(&ExcludeSet::default()).unwrap().is_empty());
    }

    #[test]
    fn test_update_mirrors_generated_tree() {
        let project = TempDir::new().unwrap();
        let store = ReferenceStore::for_project(project.path());
        let root = store.resolve(&TestIdentity::named("case")).unwrap();

        let first = generated_tree(&[("a.txt", "a\n"), ("sub/b.txt", "b\n")]);
        let snapshot = walk(first.path(), &WalkOptions::default()).unwrap();
        assert_eq!(store.update(&snapshot, &root).unwrap(), 2);

        let second = generated_tree(&[("c.txt", "c\n")]);
        let snapshot = walk(second.path(), &WalkOptions::default()).unwrap();
        store.update(&snapshot, &root).unwrap();

        let stored = root.snapshot(&ExcludeSet::default()).unwrap();
        let names: Vec<&str> = stored.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["c.txt"]);
        assert_eq!(fs::read_to_string(root.path().join("c.txt")).unwrap(), "c\n");
    }
}
