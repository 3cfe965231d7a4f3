//! refdata engine - invocation boundary
//!
//! Coordinates the comparison kernel and the filesystem store for one
//! reference-data check: settings are loaded once, generated output is
//! staged, then compared against (or swapped into) the reference tree.
//!
//! ```no_run
//! use refdata_engine::assert_refdata;
//!
//! # fn produce() -> std::path::PathBuf { std::path::PathBuf::from("out") }
//! let out_dir = produce();
//! assert_refdata!(&out_dir, "report_layout");
//! assert_refdata!(&out_dir, "report_layout_lenient", |request| {
//!     request.with_excludes(["*.log"]).with_stdout("done\n")
//! });
//! ```

#![allow(clippy::result_large_err)]

pub mod commands;
pub mod settings;

pub use commands::compare::compare_paths;
pub use commands::refdata::{assert_refdata, RefdataOutcome, RefdataRequest};
pub use refdata_store::{Replacement, TestIdentity};
pub use settings::Settings;

/// Identity of the calling test: the caller's module path plus `name`.
#[macro_export]
macro_rules! refdata_identity {
    ($name:expr) => {
        $crate::TestIdentity::qualified(module_path!(), $name)
    };
}

/// Compare generated output against the reference named `name` and panic
/// with the rendered report on mismatch.
///
/// Settings are loaded for the calling crate's `CARGO_MANIFEST_DIR`. An
/// optional closure adjusts the [`RefdataRequest`].
#[macro_export]
macro_rules! assert_refdata {
    ($generated:expr, $name:expr) => {
        $crate::run_assert(
            env!("CARGO_MANIFEST_DIR"),
            $crate::RefdataRequest::new($generated, $crate::refdata_identity!($name)),
            |request| request,
        )
    };
    ($generated:expr, $name:expr, $configure:expr) => {
        $crate::run_assert(
            env!("CARGO_MANIFEST_DIR"),
            $crate::RefdataRequest::new($generated, $crate::refdata_identity!($name)),
            $configure,
        )
    };
}

#[doc(hidden)]
#[track_caller]
pub fn run_assert<F>(project_root: &str, request: RefdataRequest, configure: F) -> RefdataOutcome
where
    F: FnOnce(RefdataRequest) -> RefdataRequest,
{
    let settings = match Settings::load(project_root) {
        Ok(settings) => settings,
        Err(err) => panic!("{}", err),
    };
    if let Some(profile) = settings.log {
        refdata_core::logging_facility::init(profile);
    }
    match assert_refdata(&settings, configure(request)) {
        Ok(outcome) => outcome,
        Err(err) => panic!("{}", err),
    }
}
