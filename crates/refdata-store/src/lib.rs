//! refdata store - filesystem layer
//!
//! Provides:
//! - Deterministic tree walking with exclude patterns
//! - Reading both trees of a comparison into per-path results
//! - The reference store: identity → directory mapping and stage-then-swap updates
//! - Staging of generated output (replacements, text blobs)

pub mod compare;
pub mod errors;
pub mod reference;
pub mod staging;
pub mod walk;

// Re-export key types
pub use compare::diff_snapshots;
pub use errors::Result;
pub use reference::{ReferenceRoot, ReferenceStore, TestIdentity};
pub use staging::{Replacement, StagedOutput, Stager};
pub use walk::{walk, ExcludeSet, MissingRoot, WalkOptions};
