//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Tree identifiers
pub const FIELD_CLASS_NAME: &str = "class_name";
pub const FIELD_DN: &str = "dn";
pub const FIELD_RN: &str = "rn";
pub const FIELD_NODE_ID: &str = "node_id";

// Collection sizes
pub const FIELD_SEGMENT_COUNT: &str = "segment_count";
pub const FIELD_CHILD_COUNT: &str = "child_count";
pub const FIELD_OBJECT_COUNT: &str = "object_count";

// Wire format
pub const FIELD_FORMAT: &str = "format";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_CLASS_NAME: &str = "err.class_name";
pub const FIELD_ERR_DN: &str = "err.dn";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
