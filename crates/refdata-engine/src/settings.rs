//! Invocation settings.
//!
//! Settings are read once at the invocation boundary from `REFDATA_*`
//! environment variables and passed down explicitly.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `REFDATA_UPDATE` | replace references instead of comparing | `false` |
//! | `REFDATA_STRICTNESS` | `strict` or `lenient` trailing newlines | `strict` |
//! | `REFDATA_CONTEXT_LINES` | context lines around each change | `3` |
//! | `REFDATA_IGNORE_TRAILING_WHITESPACE` | strip trailing blanks per line | `false` |
//! | `REFDATA_REF_ROOT` | reference store, relative to the project | `tests/refdata` |
//! | `REFDATA_EXCLUDES` | comma-separated exclude globs | `.*cache,.DS_Store` |
//! | `REFDATA_LOG` | `development` or `production` log output from the assert macro | none |
//!
//! An `.refdata-update` file in the project root also turns on update mode.

#![allow(clippy::result_large_err)]

use config::{Config, Environment};
use refdata_core::diff::{CompareOptions, Strictness};
use refdata_core::errors::{ExError, ExErrorKind, Result};
use refdata_core::logging_facility::Profile;
use refdata_store::reference::REFDATA_DIR;
use refdata_store::walk::DEFAULT_EXCLUDES;
use refdata_store::ExcludeSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Marker file that forces update mode for a whole project.
pub const UPDATE_MARKER: &str = ".refdata-update";

const ENV_PREFIX: &str = "REFDATA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project_root: PathBuf,
    pub ref_root: PathBuf,
    pub update: bool,
    pub strictness: Strictness,
    pub context_lines: usize,
    pub ignore_trailing_whitespace: bool,
    pub excludes: Vec<String>,
    /// Subscriber installed by `assert_refdata!`, if any
    pub log: Option<Profile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    update: Option<bool>,
    strictness: Option<Strictness>,
    context_lines: Option<usize>,
    ignore_trailing_whitespace: Option<bool>,
    ref_root: Option<PathBuf>,
    excludes: Option<Vec<String>>,
    log: Option<Profile>,
}

impl Settings {
    /// Defaults for `project_root`, ignoring the environment.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let project_root = project_root.as_ref().to_path_buf();
        let defaults = CompareOptions::default();
        Self {
            ref_root: project_root.join(REFDATA_DIR),
            project_root,
            update: false,
            strictness: defaults.strictness,
            context_lines: defaults.context_lines,
            ignore_trailing_whitespace: defaults.ignore_trailing_whitespace,
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            log: None,
        }
    }

    /// Load settings for `project_root` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a variable cannot be parsed.
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self> {
        Self::load_from(project_root, None)
    }

    /// Load settings with `env` standing in for the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a variable cannot be parsed.
    pub fn load_from(
        project_root: impl AsRef<Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let project_root = project_root.as_ref();
        let raw: RawSettings = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("excludes")
                    .source(env),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| config_error(project_root, e))?;

        let mut settings = Self::for_project(project_root);
        if let Some(ref_root) = raw.ref_root {
            settings.ref_root = project_root.join(ref_root);
        }
        if let Some(strictness) = raw.strictness {
            settings.strictness = strictness;
        }
        if let Some(context_lines) = raw.context_lines {
            settings.context_lines = context_lines;
        }
        if let Some(ignore) = raw.ignore_trailing_whitespace {
            settings.ignore_trailing_whitespace = ignore;
        }
        if let Some(excludes) = raw.excludes {
            settings.excludes = excludes
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        settings.log = raw.log;
        settings.update =
            raw.update.unwrap_or(false) || project_root.join(UPDATE_MARKER).exists();

        tracing::debug!(
            project_root = %project_root.display(),
            update = settings.update,
            "settings loaded"
        );
        Ok(settings)
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            strictness: self.strictness,
            context_lines: self.context_lines,
            ignore_trailing_whitespace: self.ignore_trailing_whitespace,
        }
    }

    /// Compile the configured excludes plus `extra`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed pattern.
    pub fn exclude_set(&self, extra: &[String]) -> Result<ExcludeSet> {
        ExcludeSet::new(self.excludes.iter().chain(extra))
    }
}

fn config_error(project_root: &Path, err: config::ConfigError) -> ExError {
    ExError::new(ExErrorKind::Configuration)
        .with_op("load_settings")
        .with_path(project_root.display().to_string())
        .with_message(err.to_string())
}
