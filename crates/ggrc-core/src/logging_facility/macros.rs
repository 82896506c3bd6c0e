//! Canonical logging macros
//!
//! Every operation boundary is logged with the same field set so the
//! capture layer and log pipelines can match on `op` and `event`. Field
//! keys match the `FIELD_*` constants in `core_types::schema`.

/// Shared emitter behind the `log_op_*` macros
///
/// Writes `component`, `op` and `event`, then any caller fields, at the
/// given tracing level.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use ggrc_core::log_op_start;
/// log_op_start!("deferred_save");
/// log_op_start!("deferred_save", round = 3u64, queued_len = 2u64);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::core_types::schema::EVENT_START
            $(, $($field)*)?
        );
    };
}

/// Log the successful end of an operation; `duration_ms` is required
///
/// ```
/// # use ggrc_core::log_op_end;
/// log_op_end!("instance_refresh", duration_ms = 12u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        );
    };
}

/// Log a failed operation
///
/// Anything convertible into `ExError` is accepted; its kind and stable
/// code are logged as `err.kind` and `err.code`.
///
/// ```
/// # use ggrc_core::log_op_error;
/// # use ggrc_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::SaveFailed);
/// log_op_error!("deferred_save", err, duration_ms = 10u64, round = 1u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code()
            $(, $($field)*)?
        );
    }};
}
