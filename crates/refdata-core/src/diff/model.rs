//! Comparison output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq` so a
//! report can be handed to tooling as JSON.

use crate::classify::FileClass;
use crate::tree::RelativePath;
use serde::{Deserialize, Serialize};

/// How trailing-newline differences are judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// A missing or extra final newline is a modification
    #[default]
    Strict,
    /// The final newline is ignored on both sides
    Lenient,
}

/// Knobs of the content comparator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    pub strictness: Strictness,
    /// Unchanged lines shown around each change
    pub context_lines: usize,
    /// Strip trailing spaces and tabs on both sides before comparing
    pub ignore_trailing_whitespace: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::Strict,
            context_lines: 3,
            ignore_trailing_whitespace: false,
        }
    }
}

/// Result for one path of the union of both trees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathDiff {
    pub path: RelativePath,
    pub change: PathChange,
}

impl PathDiff {
    pub fn is_failure(&self) -> bool {
        !matches!(self.change, PathChange::Unchanged)
    }
}

/// Path-level classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "diff", rename_all = "lowercase")]
pub enum PathChange {
    /// Exists only in the generated tree
    Added,
    /// Exists only in the reference tree
    Removed,
    /// Exists in both, content differs
    Modified(ContentDiff),
    /// Exists in both, content identical
    Unchanged,
}

/// Detail of a modification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentDiff {
    /// Line-level edit script between two text files
    Text { diff: LineDiff },
    /// Two binary files with different bytes
    Binary {
        reference_len: u64,
        generated_len: u64,
        reference_sha256: String,
        generated_sha256: String,
    },
    /// One side is text, the other binary
    KindMismatch {
        reference: FileClass,
        generated: FileClass,
        reference_len: u64,
        generated_len: u64,
    },
}

/// Hunks turning the reference text into the generated text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineDiff {
    pub hunks: Vec<Hunk>,
}

impl LineDiff {
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Number of inserted and removed lines across all hunks.
    pub fn change_counts(&self) -> (usize, usize) {
        let mut inserted = 0;
        let mut removed = 0;
        for line in self.hunks.iter().flat_map(|h| h.lines.iter()) {
            match line.tag {
                LineTag::Inserted => inserted += 1,
                LineTag::Removed => removed += 1,
                LineTag::Context => {}
            }
        }
        (inserted, removed)
    }
}

/// A contiguous group of changes plus surrounding context.
///
/// Starts are 0-based line indices into the reference (`old`) and generated
/// (`new`) line sequences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<LineChange>,
}

/// One line record of a hunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineChange {
    pub tag: LineTag,
    /// Line content without its terminator
    pub text: String,
    /// The line is the last one and has no terminating newline
    pub missing_newline: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    Context,
    Inserted,
    Removed,
}
