//! Reference data store
//!
//! Provides:
//! - Test identity → directory name escaping (reversible)
//! - Resolution of a reference root under `<project>/tests/refdata`
//! - Stage-then-swap replacement of a whole reference tree

mod identity;
mod store;
mod swap;

pub use identity::{escape_identity, unescape_identity, TestIdentity};
pub use store::{ReferenceRoot, ReferenceStore, REFDATA_DIR};
pub use swap::stage_then_swap;
