//! Staging of generated output
//!
//! The caller's generated output is copied into a private temporary tree
//! before it is compared or stored. Staging is where excludes, name and
//! content replacements and caller-supplied text blobs are applied, so the
//! caller's own directory is only ever read.

use crate::errors::{invalid_replacement, io_error, Result};
use crate::walk::{walk, ExcludeSet, MissingRoot, WalkOptions};
use refdata_core::classify::{classify, FileClass};
use refdata_core::errors::RefdataError;
use refdata_core::tree::{RelativePath, TreeSnapshot};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A substitution applied to staged output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Replace a filesystem path in text content. Path characters that
    /// directly follow the match are kept with `/` separators, so
    /// `<root>\sub\file` becomes `$GEN/sub/file`.
    ///
    /// The match has no boundary on either side: a search of `/work/out`
    /// also rewrites `/work/output` to `$GENput`. Pass absolute paths.
    Path { search: PathBuf, replace: String },
    /// Plain substring replacement, applied to text content and to file
    /// and directory names.
    Literal { search: String, replace: String },
}

impl Replacement {
    pub fn path(search: impl Into<PathBuf>, replace: impl Into<String>) -> Self {
        Self::Path {
            search: search.into(),
            replace: replace.into(),
        }
    }

    pub fn literal(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self::Literal {
            search: search.into(),
            replace: replace.into(),
        }
    }

    fn search_text(&self) -> String {
        match self {
            Self::Path { search, .. } => search.to_string_lossy().into_owned(),
            Self::Literal { search, .. } => search.clone(),
        }
    }

    fn compile(&self) -> Result<ContentRule> {
        let search = self.search_text();
        if search.is_empty() {
            return Err(invalid_replacement(&search, "search text is empty"));
        }
        let (pattern, replace) = match self {
            Self::Path { replace, .. } => (
                format!(r"{}([A-Za-z0-9_/\\]*)", regex::escape(&search)),
                replace,
            ),
            Self::Literal { replace, .. } => (format!("{}()", regex::escape(&search)), replace),
        };
        let regex = Regex::new(&pattern).map_err(|e| invalid_replacement(&search, &e.to_string()))?;
        Ok(ContentRule {
            regex,
            replace: replace.clone(),
        })
    }
}

struct ContentRule {
    regex: Regex,
    replace: String,
}

impl ContentRule {
    fn apply(&self, text: &str) -> Option<String> {
        let replaced = self.regex.replace_all(text, |caps: &Captures<'_>| {
            let tail = caps.get(1).map_or("", |m| m.as_str());
            format!("{}{}", self.replace, tail.replace('\\', "/"))
        });
        match replaced {
            std::borrow::Cow::Owned(s) => Some(s),
            std::borrow::Cow::Borrowed(_) => None,
        }
    }
}

/// Compile content rules: path replacements longest search first, so a
/// generated root inside the project root wins over the project root, then
/// literal replacements in the order given.
fn compile_rules(replacements: &[Replacement]) -> Result<Vec<ContentRule>> {
    let mut paths: Vec<&Replacement> = replacements
        .iter()
        .filter(|r| matches!(r, Replacement::Path { .. }))
        .collect();
    paths.sort_by_key(|r| std::cmp::Reverse(r.search_text().len()));

    paths
        .into_iter()
        .chain(
            replacements
                .iter()
                .filter(|r| matches!(r, Replacement::Literal { .. })),
        )
        .map(Replacement::compile)
        .collect()
}

/// A staged copy of generated output. The tree is deleted on drop.
#[derive(Debug)]
pub struct StagedOutput {
    dir: TempDir,
    snapshot: TreeSnapshot,
}

impl StagedOutput {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn snapshot(&self) -> &TreeSnapshot {
        &self.snapshot
    }
}

/// Builds a [`StagedOutput`] from a generated file or directory.
#[derive(Debug, Clone, Default)]
pub struct Stager {
    excludes: ExcludeSet,
    replacements: Vec<Replacement>,
    blobs: Vec<(String, String)>,
}

impl Stager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_excludes(mut self, excludes: ExcludeSet) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacements.push(replacement);
        self
    }

    pub fn with_replacements(mut self, replacements: impl IntoIterator<Item = Replacement>) -> Self {
        self.replacements.extend(replacements);
        self
    }

    /// Add a text file to the staged tree, e.g. `stdout.txt`. A blob
    /// replaces a generated file of the same name.
    pub fn with_text(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.blobs.push((name.into(), content.into()));
        self
    }

    /// Stage `generated`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `generated` does not exist
    /// - `InvalidInput` for an empty replacement search, a blob name that is
    ///   not a relative path, or a name replacement producing one
    /// - `Io` / `PermissionDenied` for filesystem failures
    pub fn stage(&self, generated: &Path) -> Result<StagedOutput> {
        match fs::metadata(generated) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RefdataError::GeneratedRootMissing {
                    path: generated.display().to_string(),
                }
                .into());
            }
            Err(e) => return Err(io_error("stage_generated", generated, e)),
        }

        let rules = compile_rules(&self.replacements)?;
        let source = walk(
            generated,
            &WalkOptions::new(self.excludes.clone(), MissingRoot::Error),
        )?;

        let dir = tempfile::Builder::new()
            .prefix("refdata-gen-")
            .tempdir()
            .map_err(|e| io_error("create_staging", &std::env::temp_dir(), e))?;

        let mut sources: HashMap<RelativePath, &RelativePath> = HashMap::new();
        for rel in &source {
            let staged_rel = self.rename(rel)?;
            if let Some(first) = sources.insert(staged_rel.clone(), rel) {
                return Err(invalid_replacement(
                    staged_rel.as_str(),
                    &format!("both '{}' and '{}' are renamed to it", first, rel),
                ));
            }
            let src = source.locate(rel);
            let dst = staged_rel.to_path(dir.path());
            create_parent(&dst)?;
            fs::copy(&src, &dst).map_err(|e| io_error("stage_copy", &src, e))?;
        }

        for (name, content) in &self.blobs {
            let rel = RelativePath::new(name.as_str())?;
            let dst = rel.to_path(dir.path());
            create_parent(&dst)?;
            fs::write(&dst, content).map_err(|e| io_error("stage_text", &dst, e))?;
        }

        let staged = walk(dir.path(), &WalkOptions::default())?;
        let mut rewritten = 0;
        if !rules.is_empty() {
            for rel in &staged {
                if replace_content(&staged.locate(rel), &rules)? {
                    rewritten += 1;
                }
            }
        }

        tracing::debug!(
            generated = %generated.display(),
            files = staged.len(),
            rewritten,
            "staged generated output"
        );
        Ok(StagedOutput {
            dir,
            snapshot: staged,
        })
    }

    /// Apply literal replacements to every segment of `rel`.
    fn rename(&self, rel: &RelativePath) -> Result<RelativePath> {
        let renamed: Vec<String> = rel
            .segments()
            .map(|segment| {
                self.replacements
                    .iter()
                    .fold(segment.to_string(), |name, r| match r {
                        Replacement::Literal { search, replace } if !search.is_empty() => {
                            name.replace(search.as_str(), replace)
                        }
                        _ => name,
                    })
            })
            .collect();
        Ok(RelativePath::new(renamed.join("/"))?)
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_staging", parent, e))?;
    }
    Ok(())
}

/// Rewrite one staged file if it is text. Returns whether it changed.
fn replace_content(path: &Path, rules: &[ContentRule]) -> Result<bool> {
    let bytes = fs::read(path).map_err(|e| io_error("read_staged", path, e))?;
    if classify(&bytes) != FileClass::Text {
        return Ok(false);
    }
    let Ok(text) = std::str::from_utf8(&bytes) else {
        return Ok(false);
    };

    let mut current = text.to_string();
    let mut changed = false;
    for rule in rules {
        if let Some(next) = rule.apply(&current) {
            current = next;
            changed = true;
        }
    }
    if changed {
        fs::write(path, current).map_err(|e| io_error("write_staged", path, e))?;
    }
    Ok(changed)
}
