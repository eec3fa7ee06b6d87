//! Boundary logging for tree operations
//!
//! `from_dn`, `populate` and `decode_response` each emit one start event and
//! then either an end or an end_error event. Extra fields (`dn`, `node_id`,
//! `class_name`, counts) follow the keys in `motree_core_types::schema`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use motree_core::log_op_start;
/// log_op_start!("from_dn");
/// log_op_start!("from_dn", dn = "uni/tn-common");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::motree_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::motree_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use motree_core::log_op_end;
/// log_op_end!("from_dn", duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::motree_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::motree_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into an `ExError` so the event carries the stable
/// kind and code, plus `err.class_name` and `err.dn` when the error names a
/// class or a Dn.
///
/// # Example
///
/// ```
/// # use motree_core::{log_op_error, errors::MoError};
/// let err = MoError::UnresolvedSegment {
///     dn: "uni/tn-a/zz-b".to_string(),
///     segment: "zz-b".to_string(),
///     parent_class: "fvTenant".to_string(),
/// };
/// log_op_error!("from_dn", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::motree_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.class_name = ex_err.class_name(),
            err.dn = ex_err.dn(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::motree_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.class_name = ex_err.class_name(),
            err.dn = ex_err.dn(),
            $($field)*
        );
    }};
}
