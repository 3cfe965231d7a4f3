//! refdata core - in-memory comparison kernel
//!
//! This crate provides the pure parts of reference-data testing:
//! - Text/binary content classification
//! - Relative paths and tree snapshots
//! - Sorted-merge reconciliation of two snapshots
//! - Content comparison (line diff with hunks, binary equality) and patching
//! - The aggregated comparison report and its rendering
//! - The error and logging facilities shared by every refdata crate
//!
//! Nothing in this crate touches the filesystem; see `refdata-store`.

pub mod classify;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod reconcile;
pub mod report;
pub mod tree;

pub use refdata_core_types::schema;

// Re-export commonly used types
pub use classify::{classify, FileClass};
pub use diff::{compare_contents, CompareOptions, ContentDiff, PathChange, PathDiff, Strictness};
pub use errors::{ExError, ExErrorKind, RefdataError, Result};
pub use reconcile::{reconcile, Pairing, Side};
pub use report::ComparisonReport;
pub use tree::{RelativePath, TreeSnapshot};
