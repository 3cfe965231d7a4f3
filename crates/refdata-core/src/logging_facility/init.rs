//! Subscriber installation.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output style of the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable, debug level, routed through the test harness writer
    Development,
    /// One JSON object per event, info level
    Production,
    /// No output; pair with `init_test_capture()`
    Test,
}

impl Profile {
    /// Directive used when `RUST_LOG` is unset or invalid.
    pub fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "refdata=debug",
            Profile::Production => "refdata=info",
            Profile::Test => "off",
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the global subscriber for `profile`.
///
/// Only the first call does anything. Returns `false` when logging was
/// already initialised or another subscriber owns the process, which is
/// normal inside test binaries.
///
/// ```
/// use refdata_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// assert!(!init(Profile::Production));
/// ```
pub fn init(profile: Profile) -> bool {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }
    let installed = match profile {
        Profile::Development => tracing_subscriber::fmt()
            .with_env_filter(profile.filter())
            .with_test_writer()
            .finish()
            .try_init(),
        Profile::Production => tracing_subscriber::fmt()
            .json()
            .with_env_filter(profile.filter())
            .finish()
            .try_init(),
        Profile::Test => tracing_subscriber::registry().try_init(),
    };
    installed.is_ok()
}
