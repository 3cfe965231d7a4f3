//! Line splitting, line diff and patch application.

use crate::diff::model::{CompareOptions, Hunk, LineChange, LineDiff, LineTag, Strictness};
use crate::errors::RefdataError;
use similar::{capture_diff_slices, group_diff_ops, Algorithm, DiffTag};

/// One normalised line. Equality is on raw bytes, so two different invalid
/// UTF-8 sequences never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Line {
    content: Vec<u8>,
    eol: bool,
}

impl Line {
    fn to_change(&self, tag: LineTag) -> LineChange {
        LineChange {
            tag,
            text: String::from_utf8_lossy(&self.content).into_owned(),
            missing_newline: !self.eol,
        }
    }

    fn matches(&self, change: &LineChange) -> bool {
        self.eol != change.missing_newline
            && String::from_utf8_lossy(&self.content) == change.text.as_str()
    }
}

/// Split on `\r\n`, `\r` and `\n`, then apply the normalisation rules of
/// `opts`. Both sides of a comparison go through this same function.
pub(crate) fn split_lines(bytes: &[u8], opts: &CompareOptions) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(line(&bytes[start..i], true, opts));
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(line(&bytes[start..i], true, opts));
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(line(&bytes[start..], false, opts));
    }

    if opts.strictness == Strictness::Lenient {
        for l in &mut lines {
            l.eol = true;
        }
    }
    lines
}

fn line(content: &[u8], eol: bool, opts: &CompareOptions) -> Line {
    let content = if opts.ignore_trailing_whitespace {
        let end = content
            .iter()
            .rposition(|b| *b != b' ' && *b != b'\t')
            .map_or(0, |p| p + 1);
        &content[..end]
    } else {
        content
    };
    Line {
        content: content.to_vec(),
        eol,
    }
}

impl LineDiff {
    /// Diff `reference` (old) against `generated` (new).
    ///
    /// Uses Myers' shortest edit script, then groups the edits into hunks
    /// with `opts.context_lines` lines of context.
    pub fn compute(reference: &[u8], generated: &[u8], opts: &CompareOptions) -> Self {
        let old = split_lines(reference, opts);
        let new = split_lines(generated, opts);

        let ops = capture_diff_slices(Algorithm::Myers, &old, &new);
        let mut hunks = Vec::new();

        for group in group_diff_ops(ops, opts.context_lines) {
            let Some(first) = group.first() else {
                continue;
            };
            let (_, first_old, first_new) = first.as_tag_tuple();
            let mut hunk = Hunk {
                old_start: first_old.start,
                old_len: 0,
                new_start: first_new.start,
                new_len: 0,
                lines: Vec::new(),
            };
            let mut has_change = false;

            for op in &group {
                let (tag, old_range, new_range) = op.as_tag_tuple();
                match tag {
                    DiffTag::Equal => {
                        for k in old_range {
                            hunk.lines.push(old[k].to_change(LineTag::Context));
                        }
                    }
                    DiffTag::Delete => {
                        has_change = true;
                        for k in old_range {
                            hunk.lines.push(old[k].to_change(LineTag::Removed));
                        }
                    }
                    DiffTag::Insert => {
                        has_change = true;
                        for k in new_range {
                            hunk.lines.push(new[k].to_change(LineTag::Inserted));
                        }
                    }
                    DiffTag::Replace => {
                        has_change = true;
                        for k in old_range {
                            hunk.lines.push(old[k].to_change(LineTag::Removed));
                        }
                        for k in new_range {
                            hunk.lines.push(new[k].to_change(LineTag::Inserted));
                        }
                    }
                }
            }

            if !has_change {
                continue;
            }
            hunk.old_len = hunk
                .lines
                .iter()
                .filter(|l| l.tag != LineTag::Inserted)
                .count();
            hunk.new_len = hunk
                .lines
                .iter()
                .filter(|l| l.tag != LineTag::Removed)
                .count();
            hunks.push(hunk);
        }

        Self { hunks }
    }

    /// Replay the hunks onto `reference` and return the generated text.
    ///
    /// `opts` must be the options the diff was computed with. The result uses
    /// `\n` line terminators.
    pub fn apply(&self, reference: &str, opts: &CompareOptions) -> Result<String, RefdataError> {
        let old = split_lines(reference.as_bytes(), opts);
        let mut out: Vec<String> = Vec::with_capacity(old.len());
        let mut cursor = 0;

        let push_old = |out: &mut Vec<String>, l: &Line| {
            let mut text = String::from_utf8_lossy(&l.content).into_owned();
            if l.eol {
                text.push('\n');
            }
            out.push(text);
        };

        for hunk in &self.hunks {
            if hunk.old_start < cursor || hunk.old_start > old.len() {
                return Err(RefdataError::PatchConflict {
                    line: hunk.old_start + 1,
                    expected: "hunk start inside the text".to_string(),
                    found: format!("{} lines, cursor at {}", old.len(), cursor),
                });
            }
            for l in &old[cursor..hunk.old_start] {
                push_old(&mut out, l);
            }
            cursor = hunk.old_start;

            for change in &hunk.lines {
                match change.tag {
                    LineTag::Context | LineTag::Removed => {
                        let found = old.get(cursor);
                        if !found.is_some_and(|l| l.matches(change)) {
                            return Err(RefdataError::PatchConflict {
                                line: cursor + 1,
                                expected: change.text.clone(),
                                found: found
                                    .map(|l| String::from_utf8_lossy(&l.content).into_owned())
                                    .unwrap_or_else(|| "<end of text>".to_string()),
                            });
                        }
                        if change.tag == LineTag::Context {
                            if let Some(l) = found {
                                push_old(&mut out, l);
                            }
                        }
                        cursor += 1;
                    }
                    LineTag::Inserted => {
                        let mut text = change.text.clone();
                        if !change.missing_newline {
                            text.push('\n');
                        }
                        out.push(text);
                    }
                }
            }
        }
        for l in &old[cursor..] {
            push_old(&mut out, l);
        }

        Ok(out.concat())
    }
}
