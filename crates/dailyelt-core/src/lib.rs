//! dailyelt Core - instrumentation library and daily pipeline stub
//!
//! This crate provides:
//! - A value formatter that renders arbitrary values as truncated, log-safe strings
//! - A call logger that wraps functions with pre/post-call logging and runtime metrics
//! - A section timer that logs the elapsed runtime of named code sections
//! - The logging facility (initialization, sinks, test capture)
//! - Stub extraction sources and the daily pipeline run that ties it all together

pub mod call_logger;
pub mod config;
pub mod errors;
pub mod extract;
pub mod format;
pub mod logging_facility;
pub mod pipeline;
pub mod section_timer;

// Re-export commonly used types
pub use call_logger::{CallArgs, CallLogger, LogArgs, LoggedFn};
pub use config::PipelineConfig;
pub use errors::{ElError, ElErrorKind, Result};
pub use extract::{ExtractResult, ExtractStatus, Extractor, Period, Source};
pub use format::{format_for_log, truncate, LogValue, ToLogValue};
pub use logging_facility::{LogSink, MemorySink, Severity, SinkRegistry};
pub use pipeline::{run_daily, Pipeline, RunSummary};
pub use section_timer::SectionTimer;
