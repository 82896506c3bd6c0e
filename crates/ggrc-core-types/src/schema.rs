//! Canonical schema constants for structured logging and events
//!
//! The logging macros emit these keys and the test capture layer reads
//! them back, so log assertions name fields through the constants.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_SNAPSHOT_ID: &str = "snapshot_id";
pub const FIELD_MODEL_TYPE: &str = "model_type";

// Save coordination
pub const FIELD_ROUND: &str = "round";
pub const FIELD_QUEUED_LEN: &str = "queued_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_MISSING_REVISION: &str = "missing_revision";
