//! Names shared by every refdata crate.
//!
//! Log consumers and tests match on these strings, so they are defined once
//! here and never spelled out inline.

/// Keys of structured log fields.
pub mod field {
    pub const COMPONENT: &str = "component";
    pub const OP: &str = "op";
    pub const EVENT: &str = "event";
    pub const DURATION_MS: &str = "duration_ms";
    pub const MESSAGE: &str = "message";

    pub const IDENTITY: &str = "identity";
    pub const GENERATED_ROOT: &str = "generated_root";
    pub const REFERENCE_ROOT: &str = "reference_root";
    /// Number of paths compared or written
    pub const FILES: &str = "files";
    pub const UPDATED: &str = "updated";

    pub const ERR_KIND: &str = "err.kind";
    pub const ERR_CODE: &str = "err.code";
}

/// Values of the `event` field.
pub mod event {
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const END_ERROR: &str = "end_error";
}

/// Operations that own lifecycle logging.
pub mod op {
    pub const ASSERT_REFDATA: &str = "assert_refdata";
    pub const COMPARE_PATHS: &str = "compare_paths";

    /// Every boundary operation.
    pub const ALL: &[&str] = &[ASSERT_REFDATA, COMPARE_PATHS];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_distinct() {
        assert_ne!(event::START, event::END);
        assert_ne!(event::START, event::END_ERROR);
        assert_ne!(event::END, event::END_ERROR);
    }

    #[test]
    fn test_ops_are_unique_snake_case() {
        for (i, name) in op::ALL.iter().enumerate() {
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
            assert!(!op::ALL[i + 1..].contains(name));
        }
    }

    #[test]
    fn test_error_fields_are_namespaced() {
        assert!(field::ERR_KIND.starts_with("err."));
        assert!(field::ERR_CODE.starts_with("err."));
    }
}
