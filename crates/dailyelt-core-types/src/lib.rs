//! Core types shared across dailyelt facilities
//!
//! This crate provides foundational types used by both the instrumentation
//! library and the pipeline entrypoint:
//!
//! - **Correlation types**: RunId
//! - **Schema constants**: Canonical field keys, sink names and section names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
