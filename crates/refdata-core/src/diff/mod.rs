//! Content comparison.
//!
//! Compares the bytes of one path as found in the reference and in the
//! generated tree, and renders the outcome for humans.
//!
//! ## Entry point
//!
//! ```
//! use refdata_core::diff::{compare_contents, CompareOptions, PathChange};
//!
//! let change = compare_contents(b"hello\nworld\n", b"hello\n", &CompareOptions::default());
//! assert!(matches!(change, PathChange::Modified(_)));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical results.
//! - **No text diff of binary content**: binary files are compared byte for
//!   byte and reported with lengths and digests only.
//! - **Symmetric normalisation**: both sides pass through the same line
//!   splitting and whitespace rules.

pub mod engine;
pub mod human_summary;
pub mod model;
pub mod text;

pub use engine::compare_contents;
pub use human_summary::render_path_diff;
pub use model::{
    CompareOptions, ContentDiff, Hunk, LineChange, LineDiff, LineTag, PathChange, PathDiff,
    Strictness,
};
