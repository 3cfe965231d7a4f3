//! Invocation boundary.
//!
//! Provides the two entry points of a reference-data check, each with
//! boundary logging:
//! - `compare_paths`: compare two existing trees
//! - `assert_refdata`: stage generated output, then compare against or
//!   update the stored reference of a test identity

pub mod compare;
pub mod refdata;
