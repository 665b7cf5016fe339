//! Log sinks
//!
//! A sink is the only thing the call logger and the section timer know about
//! logging: a named destination that accepts `(severity, message)` pairs.

use crate::errors::{ElError, Result};
use crate::logging_facility::macros::emit_at;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Ordinal log severity
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ElError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(ElError::Config {
                reason: format!("unknown severity '{}'", s),
            }),
        }
    }
}

/// A destination for leveled, pre-formatted log messages
pub trait LogSink: Send + Sync {
    /// Logical name of the sink
    fn name(&self) -> &str;

    /// Write one message at the given severity
    fn log(&self, level: Severity, message: &str);
}

/// Sink that forwards every message as a `tracing` event
///
/// Where the event ends up (console, JSON, file) is decided by the subscriber
/// installed through [`init`](super::init).
#[derive(Debug, Clone)]
pub struct TracingSink {
    name: String,
    prefix: Option<String>,
}

impl TracingSink {
    fn new(name: impl Into<String>, prefix: Option<String>) -> Self {
        Self {
            name: name.into(),
            prefix,
        }
    }

    /// Prefix prepended to every message, if any
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl LogSink for TracingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, level: Severity, message: &str) {
        let message: Cow<'_, str> = match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{}{}", prefix, message)),
            None => Cow::Borrowed(message),
        };
        emit_at!(
            level,
            logger = %self.name,
            severity = %level,
            "{}",
            message
        );
    }
}

/// Sink that keeps every message in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    name: String,
    records: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Mutex::new(Vec::new()),
        }
    }

    /// All records written so far, in write order
    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Messages only, in write order
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|(_, m)| m).collect()
    }

    pub fn clear(&self) {
        self.records.lock().map(|mut r| r.clear()).ok();
    }
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, level: Severity, message: &str) {
        self.records
            .lock()
            .map(|mut r| r.push((level, message.to_string())))
            .ok();
    }
}

/// Hands out named tracing sinks, at most one per name
#[derive(Debug, Default)]
pub struct SinkRegistry {
    names: HashSet<String>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the sink for `name`
    ///
    /// # Errors
    ///
    /// Returns [`ElError::AlreadyExists`] if a sink with this name was
    /// already created by this registry.
    pub fn create(&mut self, name: &str) -> Result<Arc<TracingSink>> {
        self.register(name, None)
    }

    /// Create the sink for `name`, prefixing every message with `prefix`
    ///
    /// # Errors
    ///
    /// Returns [`ElError::AlreadyExists`] if a sink with this name was
    /// already created by this registry.
    pub fn create_prefixed(&mut self, name: &str, prefix: &str) -> Result<Arc<TracingSink>> {
        self.register(name, Some(prefix.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn register(&mut self, name: &str, prefix: Option<String>) -> Result<Arc<TracingSink>> {
        if !self.names.insert(name.to_string()) {
            return Err(ElError::AlreadyExists {
                resource: format!("logger {}", name),
            });
        }
        Ok(Arc::new(TracingSink::new(name, prefix)))
    }
}
