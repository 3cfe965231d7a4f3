//! Lifecycle logging macros
//!
//! A boundary operation logs one `start` event, then exactly one `end` or
//! `end_error` event. All three go through `__log_op_event!`, so the
//! `component`, `op` and `event` fields are always present.
//!
//! Callers need `tracing` in scope; the event names come from
//! [`crate::schema`].

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr) => {
        tracing::$level!(component = module_path!(), op = $op, event = $event)
    };
    ($level:ident, $op:expr, $event:expr, $($field:tt)*) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($field)*
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use refdata_core::log_op_start;
/// log_op_start!("assert_refdata");
/// log_op_start!("assert_refdata", identity = "suite::case1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, $crate::schema::event::START $(, $($field)*)?)
    };
}

/// Log the successful end of an operation. `duration_ms` is mandatory.
///
/// ```
/// # use refdata_core::log_op_end;
/// log_op_end!("assert_refdata", duration_ms = 42, files = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::schema::event::END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log the failed end of an operation with the error's kind and code.
///
/// `$err` is anything convertible into [`crate::errors::ExError`].
///
/// ```
/// # use refdata_core::log_op_error;
/// # use refdata_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::ComparisonMismatch);
/// log_op_error!("assert_refdata", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            $crate::schema::event::END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
