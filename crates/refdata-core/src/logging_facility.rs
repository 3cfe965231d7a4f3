//! Structured logging for refdata
//!
//! - `init(profile)` installs the process-wide subscriber, at most once
//! - `log_op_start!`, `log_op_end!` and `log_op_error!` emit the lifecycle
//!   events of boundary operations (see [`crate::schema`] for field names)
//! - `init_test_capture()` records events in memory for assertions and for
//!   the `logging.txt` reference blob
//!
//! Only `refdata-engine` emits lifecycle events. The store and the kernel
//! log details with `tracing::debug!`.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, render_log_lines, CapturedEvent, TestCapture};
