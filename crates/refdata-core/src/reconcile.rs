//! Path reconciliation between a generated and a reference snapshot.

use crate::tree::{RelativePath, TreeSnapshot};
use std::cmp::Ordering;

/// Where a path was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Only in the generated tree (reported as added)
    GeneratedOnly,
    /// Only in the reference tree (reported as removed)
    ReferenceOnly,
    /// In both trees (content must be compared)
    Both,
}

/// One path of the union of both snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub path: RelativePath,
    pub side: Side,
}

/// Classify every path of both snapshots exactly once.
///
/// Sorted-merge join over the already ordered snapshots; paths match on
/// exact string equality.
pub fn reconcile(generated: &TreeSnapshot, reference: &TreeSnapshot) -> Vec<Pairing> {
    let gen = generated.entries();
    let refs = reference.entries();
    let mut out = Vec::with_capacity(gen.len().max(refs.len()));
    let (mut i, mut j) = (0, 0);

    while i < gen.len() && j < refs.len() {
        match gen[i].cmp(&refs[j]) {
            Ordering::Less => {
                out.push(pair(&gen[i], Side::GeneratedOnly));
                i += 1;
            }
            Ordering::Greater => {
                out.push(pair(&refs[j], Side::ReferenceOnly));
                j += 1;
            }
            Ordering::Equal => {
                out.push(pair(&gen[i], Side::Both));
                i += 1;
                j += 1;
            }
        }
    }
    out.extend(gen[i..].iter().map(|p| pair(p, Side::GeneratedOnly)));
    out.extend(refs[j..].iter().map(|p| pair(p, Side::ReferenceOnly)));

    out
}

fn pair(path: &RelativePath, side: Side) -> Pairing {
    Pairing {
        path: path.clone(),
        side,
    }
}
