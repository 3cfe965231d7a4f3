//! Test identity escaping
//!
//! Maps a test identity onto a single directory name. `::` module separators
//! become `.`; every byte outside `[A-Za-z0-9_.-]` is written as `%XX`, as is
//! a leading `.` so no identity maps to a hidden or relative directory.

use refdata_core::errors::RefdataError;
use std::fmt;

/// The identity of one test, used to locate its reference data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TestIdentity {
    /// A test function inside a module path, e.g. `suite::case1`
    Qualified { module: String, name: String },
    /// A free-form name chosen by the caller
    Named(String),
}

impl TestIdentity {
    /// Build a qualified identity. A leading crate segment of `module_path!()`
    /// is kept; it is part of what makes the identity unique.
    pub fn qualified(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Qualified {
            module: module.into(),
            name: name.into(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The unescaped identity string, `module::name` or the plain name.
    pub fn display_name(&self) -> String {
        match self {
            Self::Qualified { module, name } if module.is_empty() => name.clone(),
            Self::Qualified { module, name } => format!("{}::{}", module, name),
            Self::Named(name) => name.clone(),
        }
    }

    /// The directory name this identity maps to.
    pub fn dir_name(&self) -> Result<String, RefdataError> {
        escape_identity(&self.display_name())
    }
}

impl fmt::Display for TestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Escape `identity` into a directory name.
///
/// # Errors
///
/// Returns `InvalidIdentity` for an empty identity.
pub fn escape_identity(identity: &str) -> Result<String, RefdataError> {
    if identity.trim().is_empty() {
        return Err(RefdataError::InvalidIdentity {
            identity: identity.to_string(),
            reason: "identity is empty".to_string(),
        });
    }

    let dotted = identity.replace("::", ".");
    let mut out = String::with_capacity(dotted.len());
    for (i, byte) in dotted.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.');
        if keep && !(i == 0 && byte == b'.') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    Ok(out)
}

/// Decode `%XX` sequences of an escaped directory name.
///
/// `::` is not restored: `a::b` and `a.b` share a directory.
///
/// # Errors
///
/// Returns `InvalidIdentity` for a truncated or non-hex escape, or if the
/// decoded bytes are not UTF-8.
pub fn unescape_identity(dir_name: &str) -> Result<String, RefdataError> {
    let invalid = |reason: &str| RefdataError::InvalidIdentity {
        identity: dir_name.to_string(),
        reason: reason.to_string(),
    };

    let bytes = dir_name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .ok_or_else(|| invalid("truncated escape"))?;
            let value = u8::from_str_radix(hex, 16).map_err(|_| invalid("bad escape"))?;
            out.push(value);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| invalid("escape is not UTF-8"))
}
