//! Text/binary content classification.
//!
//! Classification looks at bytes only, never at file names. It is a
//! heuristic: a text file full of control characters will be called binary,
//! and that is accepted.

use serde::{Deserialize, Serialize};

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 8 * 1024;

/// Share of suspicious units above which content is binary.
pub const MAX_SUSPICIOUS_RATIO: f64 = 0.3;

/// How a file's content is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileClass {
    Text,
    Binary,
}

impl FileClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileClass::Text => "text",
            FileClass::Binary => "binary",
        }
    }
}

impl std::fmt::Display for FileClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `bytes` as text or binary.
///
/// - empty content is text
/// - a NUL byte in the inspected prefix means binary
/// - otherwise binary when more than [`MAX_SUSPICIOUS_RATIO`] of the prefix
///   is control characters or undecodable UTF-8
pub fn classify(bytes: &[u8]) -> FileClass {
    if bytes.is_empty() {
        return FileClass::Text;
    }

    let prefix = &bytes[..bytes.len().min(SNIFF_LEN)];
    if prefix.contains(&0) {
        return FileClass::Binary;
    }

    let (suspicious, total) = tally(prefix);
    if total == 0 {
        return FileClass::Text;
    }

    if suspicious as f64 / total as f64 > MAX_SUSPICIOUS_RATIO {
        FileClass::Binary
    } else {
        FileClass::Text
    }
}

/// Count `(suspicious, total)` units in `prefix`.
///
/// Each decoded char counts as one unit; each byte of an invalid UTF-8
/// sequence counts as one suspicious unit. A sequence cut off by the end of
/// the prefix is ignored.
fn tally(prefix: &[u8]) -> (usize, usize) {
    let mut suspicious = 0;
    let mut total = 0;
    let mut rest = prefix;

    loop {
        match std::str::from_utf8(rest) {
            Ok(text) => {
                tally_chars(text, &mut suspicious, &mut total);
                break;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                if let Ok(text) = std::str::from_utf8(valid) {
                    tally_chars(text, &mut suspicious, &mut total);
                }
                match err.error_len() {
                    Some(len) => {
                        suspicious += len;
                        total += len;
                        rest = &after[len..];
                    }
                    None => break,
                }
            }
        }
    }

    (suspicious, total)
}

fn tally_chars(text: &str, suspicious: &mut usize, total: &mut usize) {
    for ch in text.chars() {
        *total += 1;
        if is_suspicious(ch) {
            *suspicious += 1;
        }
    }
}

fn is_suspicious(ch: char) -> bool {
    match ch {
        '\t' | '\n' | '\r' | '\x0c' | '\x1b' | '\x08' => false,
        c => c.is_control(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_text() {
        assert_eq!(classify(b""), FileClass::Text);
    }

    #[test]
    fn test_plain_ascii_is_text() {
        assert_eq!(classify(b"hello\nworld\n"), FileClass::Text);
    }

    #[test]
    fn test_utf8_is_text() {
        assert_eq!(classify("grüße, 世界\n".as_bytes()), FileClass::Text);
    }

    #[test]
    fn test_nul_is_binary() {
        assert_eq!(classify(b"abc\0def"), FileClass::Binary);
    }

    #[test]
    fn test_byte_range_is_binary() {
        let blob: Vec<u8> = (0u8..40).collect();
        assert_eq!(classify(&blob), FileClass::Binary);
    }

    #[test]
    fn test_mostly_invalid_utf8_is_binary() {
        let blob = [0xff, 0xfe, 0xfd, b'a', 0xfc, 0xfb];
        assert_eq!(classify(&blob), FileClass::Binary);
    }

    #[test]
    fn test_single_invalid_byte_in_text_is_text() {
        let mut text = b"latin-1 caf".to_vec();
        text.push(0xe9);
        text.extend_from_slice(b" is still text\n");
        assert_eq!(classify(&text), FileClass::Text);
    }

    #[test]
    fn test_nul_after_prefix_is_ignored() {
        let mut content = vec![b'a'; SNIFF_LEN];
        content.push(0);
        assert_eq!(classify(&content), FileClass::Text);
    }

    #[test]
    fn test_truncated_multibyte_at_prefix_end_is_text() {
        let mut content = vec![b'a'; SNIFF_LEN - 1];
        content.extend_from_slice("é".as_bytes());
        assert_eq!(classify(&content), FileClass::Text);
    }
}
