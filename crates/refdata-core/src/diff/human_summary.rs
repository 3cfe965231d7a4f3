//! Human-readable rendering of path diffs.
//!
//! Text modifications are rendered as unified-diff hunks, reference first.

use crate::diff::model::{ContentDiff, Hunk, LineDiff, LineTag, PathChange, PathDiff};

/// Render one path diff. Unchanged paths render as an empty string.
pub fn render_path_diff(diff: &PathDiff) -> String {
    let path = diff.path.as_str();
    match &diff.change {
        PathChange::Unchanged => String::new(),
        PathChange::Added => format!("+ {}\n", path),
        PathChange::Removed => format!("- {}\n", path),
        PathChange::Modified(content) => render_content_diff(path, content),
    }
}

fn render_content_diff(path: &str, content: &ContentDiff) -> String {
    match content {
        ContentDiff::Text { diff } => render_line_diff(path, diff),
        ContentDiff::Binary {
            reference_len,
            generated_len,
            reference_sha256,
            generated_sha256,
        } => format!(
            "Binary files differ: {}\n  reference: {} bytes, sha256 {}\n  generated: {} bytes, sha256 {}\n",
            path,
            reference_len,
            short(reference_sha256),
            generated_len,
            short(generated_sha256),
        ),
        ContentDiff::KindMismatch {
            reference,
            generated,
            reference_len,
            generated_len,
        } => format!(
            "File kinds differ: {}\n  reference: {}, {} bytes\n  generated: {}, {} bytes\n",
            path, reference, reference_len, generated, generated_len,
        ),
    }
}

/// Render a text diff with `---`/`+++` headers.
pub fn render_line_diff(path: &str, diff: &LineDiff) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- {} (reference)\n", path));
    out.push_str(&format!("+++ {} (generated)\n", path));
    for hunk in &diff.hunks {
        out.push_str(&hunk_header(hunk));
        for line in &hunk.lines {
            let marker = match line.tag {
                LineTag::Context => ' ',
                LineTag::Inserted => '+',
                LineTag::Removed => '-',
            };
            out.push(marker);
            out.push_str(&line.text);
            out.push('\n');
            if line.missing_newline {
                out.push_str("\\ No newline at end of file\n");
            }
        }
    }
    out
}

/// `@@ -l,s +l,s @@` with 1-based starts. A length of 1 is omitted and an
/// empty range points at the line before it, as `diff -u` does.
fn hunk_header(hunk: &Hunk) -> String {
    format!(
        "@@ -{} +{} @@\n",
        range(hunk.old_start, hunk.old_len),
        range(hunk.new_start, hunk.new_len)
    )
}

fn range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        n => format!("{},{}", start + 1, n),
    }
}

fn short(digest: &str) -> &str {
    if digest.len() > 12 {
        &digest[..12]
    } else {
        digest
    }
}
