//! Core types shared across refdata facilities
//!
//! This crate provides the canonical schema constants used by the logging
//! facility and by error reporting, so that every layer emits the same field
//! keys and event names.

pub mod schema;
