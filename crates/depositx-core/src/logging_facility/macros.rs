//! Operation boundary macros
//!
//! A flow emits one `start` and one `end` (or `end_error`) event under the
//! same `op`. Flows that act on a single deposit name it with a leading
//! `deposit: <address>`, which lands in the `deposit` field in its
//! `Display` form. Any further fields use plain `tracing` syntax.

#[doc(hidden)]
#[macro_export]
macro_rules! __op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)+)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::depositx_core_types::schema::$event,
            $($($field)+)?
        )
    };
}

/// Log the start of a deposit operation
///
/// ```
/// # use depositx_core::log_op_start;
/// let deposit = "0x00000000000000000000000000000000000000d1";
/// let dry_run = true;
/// log_op_start!("withdraw_funds", deposit: deposit, dry_run);
/// log_op_start!("list_deposits", owner = "0x000000000000000000000000000000000000a11c");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__op_event!(info, $op, EVENT_START)
    };
    ($op:expr, deposit: $deposit:expr $(, $($field:tt)+)?) => {
        $crate::__op_event!(info, $op, EVENT_START, deposit = %$deposit, $($($field)+)?)
    };
    ($op:expr, $($field:tt)+) => {
        $crate::__op_event!(info, $op, EVENT_START, $($field)+)
    };
}

/// Log the successful end of a deposit operation
///
/// ```
/// # use depositx_core::log_op_end;
/// log_op_end!("redeem_deposit", duration_ms = 42, deposit: "0x00000000000000000000000000000000000000d1");
/// log_op_end!("list_deposits", duration_ms = 3, count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr, deposit: $deposit:expr $(, $($field:tt)+)?) => {
        $crate::__op_event!(info, $op, EVENT_END, duration_ms = $duration, deposit = %$deposit, $($($field)+)?)
    };
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        $crate::__op_event!(info, $op, EVENT_END, duration_ms = $duration, $($($field)+)?)
    };
}

/// Log a failed deposit operation with its error kind and stable code
///
/// `$err` must convert into [`ExError`](crate::errors::ExError); the kind and
/// code land in `err.kind` and `err.code`.
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr, deposit: $deposit:expr $(, $($field:tt)+)?) => {
        $crate::log_op_error!($op, $err, duration_ms = $duration, deposit = %$deposit, $($($field)+)?)
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)+)?
        )
    }};
}
