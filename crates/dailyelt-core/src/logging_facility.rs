//! Structured logging facility for dailyelt
//!
//! This module provides:
//! - Single initialization point via `init(profile, log_file)`
//! - The `LogSink` capability that the call logger and section timer write to
//! - A `SinkRegistry` that hands out one named sink per logical name
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use dailyelt_core::logging_facility::{init, Profile, Severity, SinkRegistry, LogSink};
//!
//! // Initialize once at application startup
//! init(Profile::Development, None).unwrap();
//!
//! let mut registry = SinkRegistry::new();
//! let sink = registry.create("main").unwrap();
//! sink.log(Severity::Info, "pipeline starting");
//! ```

pub mod init;
mod macros;
pub mod sink;
pub mod test_capture;

pub use init::{init, Profile};
pub use sink::{LogSink, MemorySink, Severity, SinkRegistry, TracingSink};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
