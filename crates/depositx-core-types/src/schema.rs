//! Canonical field keys and event names for structured logging

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Instrument context
pub const FIELD_DEPOSIT: &str = "deposit";
pub const FIELD_STATE: &str = "state";
pub const FIELD_LOT_SIZE: &str = "lot_size";
pub const FIELD_REASON: &str = "reason";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Operation boundary events
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// Emitted when a flow observes a lifecycle event from the ledger
pub const EVENT_LIFECYCLE: &str = "lifecycle";
/// Emitted by the resolver when it rejects a command line
pub const EVENT_DIAGNOSTIC: &str = "diagnostic";
