//! Aggregated comparison report.
//!
//! One [`ComparisonReport`] per invocation. It holds every path of the union
//! of both trees, renders the failures in a fixed order (added, removed,
//! modified) and turns into at most one error.

use crate::diff::human_summary::render_path_diff;
use crate::diff::model::{PathChange, PathDiff};
use crate::errors::{ExError, ExErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonReport {
    pub reference_root: PathBuf,
    pub generated_root: PathBuf,
    /// One entry per path, in path order
    pub entries: Vec<PathDiff>,
}

/// Per-status counts of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl ComparisonReport {
    pub fn new(reference_root: &Path, generated_root: &Path, entries: Vec<PathDiff>) -> Self {
        Self {
            reference_root: reference_root.to_path_buf(),
            generated_root: generated_root.to_path_buf(),
            entries,
        }
    }

    /// True if any path is not unchanged.
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(PathDiff::is_failure)
    }

    /// Entries that are not unchanged, in path order.
    pub fn failures(&self) -> impl Iterator<Item = &PathDiff> {
        self.entries.iter().filter(|e| e.is_failure())
    }

    pub fn counts(&self) -> ReportCounts {
        let mut counts = ReportCounts::default();
        for entry in &self.entries {
            match entry.change {
                PathChange::Added => counts.added += 1,
                PathChange::Removed => counts.removed += 1,
                PathChange::Modified(_) => counts.modified += 1,
                PathChange::Unchanged => counts.unchanged += 1,
            }
        }
        counts
    }

    /// Human-readable rendering of every failure.
    ///
    /// Added paths come first, then removed paths, then modified paths with
    /// their content diff. Returns an empty string when nothing failed.
    pub fn render(&self) -> String {
        if !self.has_failures() {
            return String::new();
        }

        let counts = self.counts();
        let mut out = String::new();
        out.push_str(&format!(
            "Reference mismatch: {} added, {} removed, {} modified\n",
            counts.added, counts.removed, counts.modified
        ));
        out.push_str(&format!(
            "  reference: {}\n  generated: {}\n",
            self.reference_root.display(),
            self.generated_root.display()
        ));

        let section = |out: &mut String, title: &str, pick: fn(&PathChange) -> bool| {
            let picked: Vec<&PathDiff> = self.entries.iter().filter(|e| pick(&e.change)).collect();
            if picked.is_empty() {
                return;
            }
            out.push_str(&format!("\n{}:\n", title));
            for entry in picked {
                out.push_str(&render_path_diff(entry));
            }
        };

        section(&mut out, "Added (only in generated)", |c| {
            matches!(c, PathChange::Added)
        });
        section(&mut out, "Removed (only in reference)", |c| {
            matches!(c, PathChange::Removed)
        });
        section(&mut out, "Modified", |c| matches!(c, PathChange::Modified(_)));

        out
    }

    /// Pretty JSON for tooling that wants the structured diff.
    pub fn to_json(&self) -> Result<String, ExError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("report_to_json")
                .with_message(e.to_string())
        })
    }

    /// `Ok(())` without failures, otherwise one `ComparisonMismatch` error
    /// carrying the full rendering and this report.
    pub fn into_result(self) -> Result<(), ExError> {
        if !self.has_failures() {
            return Ok(());
        }
        let rendered = self.render();
        Err(ExError::new(ExErrorKind::ComparisonMismatch)
            .with_op("compare_trees")
            .with_path(self.reference_root.display().to_string())
            .with_message(rendered)
            .with_report(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::engine::compare_contents;
    use crate::diff::model::CompareOptions;
    use crate::tree::RelativePath;

    fn entry(path: &str, change: PathChange) -> PathDiff {
        PathDiff {
            path: RelativePath::new(path).unwrap(),
            change,
        }
    }

    fn report(entries: Vec<PathDiff>) -> ComparisonReport {
        ComparisonReport::new(Path::new("/ref"), Path::new("/gen"), entries)
    }

    #[test]
    fn test_all_unchanged_is_success() {
        let r = report(vec![entry("a", PathChange::Unchanged)]);
        assert!(!r.has_failures());
        assert!(r.render().is_empty());
        assert!(r.into_result().is_ok());
    }

    #[test]
    fn test_render_orders_added_removed_modified() {
        let modified = compare_contents(b"x\ny\n", b"x\n", &CompareOptions::default());
        let r = report(vec![
            entry("a.txt", modified),
            entry("new.bin", PathChange::Added),
            entry("old.bin", PathChange::Removed),
            entry("same", PathChange::Unchanged),
        ]);

        let text = r.render();
        let added = text.find("+ new.bin").unwrap();
        let removed = text.find("- old.bin").unwrap();
        let modified = text.find("--- a.txt (reference)").unwrap();
        assert!(added < removed && removed < modified);
        assert!(!text.contains("same"));
        assert!(text.starts_with("Reference mismatch: 1 added, 1 removed, 1 modified\n"));
    }

    #[test]
    fn test_into_result_is_single_aggregated_error() {
        let r = report(vec![
            entry("new.bin", PathChange::Added),
            entry("old.bin", PathChange::Removed),
        ]);

        let err = r.into_result().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ComparisonMismatch);
        assert!(err.message().contains("new.bin"));
        assert!(err.message().contains("old.bin"));
        assert_eq!(err.report().map(|r| r.entries.len()), Some(2));
    }

    #[test]
    fn test_counts() {
        let r = report(vec![
            entry("a", PathChange::Added),
            entry("b", PathChange::Unchanged),
            entry("c", PathChange::Unchanged),
        ]);
        assert_eq!(
            r.counts(),
            ReportCounts {
                added: 1,
                removed: 0,
                modified: 0,
                unchanged: 2
            }
        );
    }

    #[test]
    fn test_report_serializes_to_json() {
        let r = report(vec![entry("a", PathChange::Added)]);
        let json: serde_json::Value = serde_json::from_str(&r.to_json().unwrap()).unwrap();
        assert_eq!(json["entries"][0]["path"], "a");
        assert_eq!(json["entries"][0]["change"]["status"], "added");
    }
}
