//! Content comparator.
//!
//! The core entry point is [`compare_contents`], which accepts the raw bytes
//! of one path from both trees and produces a [`PathChange`].

use crate::classify::{classify, FileClass};
use crate::diff::model::{CompareOptions, ContentDiff, LineDiff, PathChange};
use sha2::{Digest as _, Sha256};

/// Compare the generated bytes of a path with its reference bytes.
///
/// 1. Both sides are classified independently; differing classes are a
///    `KindMismatch`.
/// 2. Binary content is compared for exact equality.
/// 3. Text content is line-diffed under `opts`.
///
/// Never fails: every pair of byte sequences has an outcome.
pub fn compare_contents(generated: &[u8], reference: &[u8], opts: &CompareOptions) -> PathChange {
    let generated_class = classify(generated);
    let reference_class = classify(reference);

    if generated_class != reference_class {
        return PathChange::Modified(ContentDiff::KindMismatch {
            reference: reference_class,
            generated: generated_class,
            reference_len: reference.len() as u64,
            generated_len: generated.len() as u64,
        });
    }

    match generated_class {
        FileClass::Binary => {
            if generated == reference {
                PathChange::Unchanged
            } else {
                PathChange::Modified(ContentDiff::Binary {
                    reference_len: reference.len() as u64,
                    generated_len: generated.len() as u64,
                    reference_sha256: sha256_hex(reference),
                    generated_sha256: sha256_hex(generated),
                })
            }
        }
        FileClass::Text => {
            // Fast path, also covers the empty/empty case.
            if generated == reference {
                return PathChange::Unchanged;
            }
            let diff = LineDiff::compute(reference, generated, opts);
            if diff.is_empty() {
                PathChange::Unchanged
            } else {
                PathChange::Modified(ContentDiff::Text { diff })
            }
        }
    }
}

fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
