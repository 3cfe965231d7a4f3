//! Error handling for refdata-store
//!
//! Wraps refdata-core ExError with store-specific helpers

use refdata_core::errors::{ExError, ExErrorKind};

pub use refdata_core::errors::io_error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an invalid replacement error
pub fn invalid_replacement(search: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("compile_replacements")
        .with_message(format!("Invalid replacement for '{}': {}", search, reason))
}

/// Convert a walkdir failure into an ExError
pub fn walk_error(root: &std::path::Path, err: walkdir::Error) -> ExError {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(io) => io_error("walk", &path, io),
        None => ExError::new(ExErrorKind::Io)
            .with_op("walk")
            .with_path(path.display().to_string())
            .with_message("filesystem loop detected"),
    }
}
