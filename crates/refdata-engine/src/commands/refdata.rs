//! Reference-data assertion with boundary logging.
//!
//! One call stages the generated output, then either replaces the stored
//! reference (update mode) or compares against it and fails with a single
//! aggregated report.

#![allow(clippy::result_large_err)]

use crate::settings::Settings;
use refdata_core::errors::RefdataError;
use refdata_core::logging_facility::TestCapture;
use refdata_core::report::ComparisonReport;
use refdata_core::schema::op;
use refdata_core::{log_op_end, log_op_error, log_op_start};
use refdata_store::errors::{io_error, Result};
use refdata_store::{diff_snapshots, ReferenceStore, Replacement, Stager, TestIdentity};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Placeholder written in place of the generated root.
pub const GEN_PLACEHOLDER: &str = "$GEN";
/// Placeholder written in place of the project root.
pub const PRJ_PLACEHOLDER: &str = "$PRJ";

/// Everything one assertion needs besides the settings.
#[derive(Debug, Clone)]
pub struct RefdataRequest {
    generated: PathBuf,
    identity: TestIdentity,
    update: Option<bool>,
    excludes: Vec<String>,
    replacements: Vec<Replacement>,
    blobs: Vec<(String, String)>,
}

impl RefdataRequest {
    pub fn new(generated: impl Into<PathBuf>, identity: TestIdentity) -> Self {
        Self {
            generated: generated.into(),
            identity,
            update: None,
            excludes: Vec::new(),
            replacements: Vec::new(),
            blobs: Vec::new(),
        }
    }

    pub fn identity(&self) -> &TestIdentity {
        &self.identity
    }

    /// Override the configured update mode for this call only.
    pub fn with_update(mut self, update: bool) -> Self {
        self.update = Some(update);
        self
    }

    /// Exclude patterns on top of the configured ones.
    pub fn with_excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacements.push(replacement);
        self
    }

    /// Store `content` as the text file `name` next to the generated files.
    pub fn with_text(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.blobs.push((name.into(), content.into()));
        self
    }

    pub fn with_stdout(self, content: impl Into<String>) -> Self {
        self.with_text("stdout.txt", content)
    }

    pub fn with_stderr(self, content: impl Into<String>) -> Self {
        self.with_text("stderr.txt", content)
    }

    /// Drain the captured events whose target starts with `target_prefix`
    /// into `logging.txt`.
    pub fn with_log(self, capture: &TestCapture, target_prefix: &str) -> Self {
        let lines = capture.take_log_lines(target_prefix);
        self.with_text("logging.txt", lines)
    }
}

/// What a successful assertion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefdataOutcome {
    /// Generated output matched the reference
    Matched { files: usize },
    /// The reference was replaced with the generated output
    Updated { files: usize },
}

/// Check generated output against the reference of `request`'s identity.
///
/// ## Update mode
///
/// With `settings.update` (or a per-call override) the reference tree is
/// replaced by the staged output and no comparison runs.
///
/// ## Errors
///
/// - `NotFound`: the generated output does not exist
/// - `InvalidInput`: bad identity, exclude pattern, replacement or blob name
/// - `ComparisonMismatch`: the trees differ; the message is the full report
/// - `Io` / `PermissionDenied`: filesystem failures; the reference is untouched
pub fn assert_refdata(settings: &Settings, request: RefdataRequest) -> Result<RefdataOutcome> {
    let identity = request.identity.to_string();
    log_op_start!(op::ASSERT_REFDATA, identity = %identity);
    let start = std::time::Instant::now();

    let outcome = assert_refdata_impl(settings, request)
        .map_err(|e| e.with_identity(identity.clone()))
        .map_err(|e| {
            log_op_error!(
                op::ASSERT_REFDATA,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                identity = %identity
            );
            e
        })?;

    let (updated, files) = match outcome {
        RefdataOutcome::Matched { files } => (false, files),
        RefdataOutcome::Updated { files } => (true, files),
    };
    log_op_end!(
        op::ASSERT_REFDATA,
        duration_ms = start.elapsed().as_millis() as u64,
        identity = %identity,
        updated = updated,
        files = files
    );

    Ok(outcome)
}

fn assert_refdata_impl(settings: &Settings, request: RefdataRequest) -> Result<RefdataOutcome> {
    let RefdataRequest {
        generated,
        identity,
        update,
        excludes,
        replacements,
        blobs,
    } = request;

    let root = resolve_generated(&generated)?;
    let excludes = settings.exclude_set(&excludes)?;
    let store = ReferenceStore::new(&settings.ref_root);
    let reference = store.resolve(&identity)?;

    let mut stager = Stager::new()
        .with_excludes(excludes.clone())
        .with_replacement(Replacement::path(&settings.project_root, PRJ_PLACEHOLDER))
        .with_replacement(Replacement::path(&root, GEN_PLACEHOLDER));
    if generated.is_absolute() && generated != root {
        // e.g. a symlinked temp dir; output may spell either form
        stager = stager.with_replacement(Replacement::path(&generated, GEN_PLACEHOLDER));
    }
    let stager = blobs.into_iter().fold(
        stager.with_replacements(replacements),
        |stager, (name, content)| stager.with_text(name, content),
    );
    let staged = stager.stage(&root)?;

    if update.unwrap_or(settings.update) {
        let files = store.update(staged.snapshot(), &reference)?;
        return Ok(RefdataOutcome::Updated { files });
    }

    let stored = reference.snapshot(&excludes)?;
    let entries = diff_snapshots(staged.snapshot(), &stored, &settings.compare_options())?;
    let files = entries.len();
    ComparisonReport::new(reference.path(), &generated, entries).into_result()?;

    Ok(RefdataOutcome::Matched { files })
}

/// Absolute form of the caller's generated path. A relative `$GEN` search
/// would also match unrelated text that happens to contain it.
fn resolve_generated(generated: &Path) -> Result<PathBuf> {
    fs::canonicalize(generated).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => RefdataError::GeneratedRootMissing {
            path: generated.display().to_string(),
        }
        .into(),
        _ => io_error("resolve_generated", generated, e),
    })
}
