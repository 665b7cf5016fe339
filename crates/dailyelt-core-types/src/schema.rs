//! Canonical schema constants for structured logging
//!
//! These constants keep field names and section names consistent between the
//! library, the binary and the tests.

// Canonical field keys for structured logging
pub const FIELD_LOGGER: &str = "logger";
pub const FIELD_SEVERITY: &str = "severity";
pub const FIELD_CRITICAL: &str = "critical";
pub const FIELD_MESSAGE: &str = "message";

// Canonical sink names
pub const SINK_MAIN: &str = "main";
pub const SINK_EXTRACT: &str = "extract";

// Canonical section names
pub const SECTION_DAILY_ELT: &str = "Daily ELT process";
pub const SECTION_EXTRACT: &str = "Extract";
pub const SECTION_FAILED: &str = "FAILED to complete daily ELT process";
