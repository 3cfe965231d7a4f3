use crate::report::ComparisonReport;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling and assertions in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    /// A hunk does not match the text it is being applied to
    InvalidPatch,

    // Comparison outcome
    /// Generated output differs from the reference (the expected test failure)
    ComparisonMismatch,

    // Integration/IO
    Io,
    PermissionDenied,
    Configuration,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidPatch => "ERR_INVALID_PATCH",
            ExErrorKind::ComparisonMismatch => "ERR_COMPARISON_MISMATCH",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::PermissionDenied => "ERR_PERMISSION_DENIED",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus context for
/// debugging. A `ComparisonMismatch` additionally carries the structured
/// report it was rendered from.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    identity: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
    report: Option<Box<ComparisonReport>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            identity: None,
            message: String::new(),
            source: None,
            report: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add test identity context
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach the structured report behind a `ComparisonMismatch`
    pub fn with_report(mut self, report: ComparisonReport) -> Self {
        self.report = Some(Box::new(report));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the identity context, if any
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get the structured report, if any (populated on ComparisonMismatch)
    pub fn report(&self) -> Option<&ComparisonReport> {
        self.report.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The mismatch message is the rendered report, keep it verbatim.
        if self.kind == ExErrorKind::ComparisonMismatch {
            return write!(f, "[{}]\n{}", self.code(), self.message);
        }
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(identity) = &self.identity {
            write!(f, " (identity: {})", identity)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for refdata operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefdataError {
    /// The generated output to compare does not exist
    #[error("Generated output not found: {path}")]
    GeneratedRootMissing { path: String },

    /// A tree root that must exist is missing
    #[error("Tree root not found: {path}")]
    TreeRootMissing { path: String },

    /// A test identity cannot be mapped to a directory name
    #[error("Invalid test identity '{identity}': {reason}")]
    InvalidIdentity { identity: String, reason: String },

    /// A relative path escapes its root or is otherwise unusable
    #[error("Invalid relative path '{path}': {reason}")]
    InvalidRelativePath { path: String, reason: String },

    /// An exclude pattern failed to parse
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },

    /// A hunk line does not match the text being patched
    #[error("Patch does not apply at line {line}: expected {expected:?}, found {found:?}")]
    PatchConflict {
        line: usize,
        expected: String,
        found: String,
    },
}

impl From<RefdataError> for ExError {
    fn from(err: RefdataError) -> Self {
        let message = err.to_string();
        match err {
            RefdataError::GeneratedRootMissing { path } => ExError::new(ExErrorKind::NotFound)
                .with_path(path)
                .with_op("resolve_generated")
                .with_message(message),

            RefdataError::TreeRootMissing { path } => ExError::new(ExErrorKind::NotFound)
                .with_path(path)
                .with_op("walk")
                .with_message(message),

            RefdataError::InvalidIdentity { identity, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_identity(identity)
                    .with_op("resolve_reference")
                    .with_message(message)
            }

            RefdataError::InvalidRelativePath { path, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_path(path)
                    .with_message(message)
            }

            RefdataError::InvalidExcludePattern { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("compile_excludes")
                .with_message(message),

            RefdataError::PatchConflict { .. } => ExError::new(ExErrorKind::InvalidPatch)
                .with_op("apply_patch")
                .with_message(message),
        }
    }
}

/// Map an I/O error onto the error facility.
///
/// `PermissionDenied` is kept distinct; every other failure is `Io`.
pub fn io_error(operation: &str, path: &std::path::Path, err: std::io::Error) -> ExError {
    let kind = match err.kind() {
        std::io::ErrorKind::PermissionDenied => ExErrorKind::PermissionDenied,
        std::io::ErrorKind::NotFound => ExErrorKind::NotFound,
        _ => ExErrorKind::Io,
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_root_missing_is_not_found() {
        let err: ExError = RefdataError::GeneratedRootMissing {
            path: "/tmp/missing".to_string(),
        }
        .into();

        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.code(), "ERR_NOT_FOUND");
        assert_eq!(err.path(), Some("/tmp/missing"));
    }

    #[test]
    fn test_io_error_keeps_permission_denied() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = io_error("update_reference", std::path::Path::new("/ref"), io);

        assert_eq!(err.kind(), ExErrorKind::PermissionDenied);
        assert_eq!(err.op(), Some("update_reference"));
    }

    #[test]
    fn test_io_error_other_is_io() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = io_error("copy", std::path::Path::new("/x"), io);

        assert_eq!(err.kind(), ExErrorKind::Io);
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::InvalidInput)
            .with_op("resolve_reference")
            .with_identity("bad")
            .with_message("empty name");

        let text = err.to_string();
        assert!(text.starts_with("[ERR_INVALID_INPUT]"));
        assert!(text.contains("resolve_reference"));
        assert!(text.contains("(identity: bad)"));
    }

    #[test]
    fn test_source_chain() {
        let inner = ExError::new(ExErrorKind::Io).with_message("inner");
        let outer = ExError::new(ExErrorKind::PermissionDenied).with_source(inner);

        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Io)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }
}
