//! Severity dispatch for tracing macros
//!
//! `tracing` needs the level at the callsite as a constant, so a runtime
//! [`Severity`](super::sink::Severity) is matched onto one macro per level.

/// Emit a tracing event at a runtime severity
///
/// `Critical` has no tracing level of its own; it is emitted at `ERROR` with
/// the [`FIELD_CRITICAL`](dailyelt_core_types::schema::FIELD_CRITICAL) field
/// set to `true`.
macro_rules! emit_at {
    ($severity:expr, $($arg:tt)+) => {
        match $severity {
            $crate::logging_facility::sink::Severity::Debug => tracing::debug!($($arg)+),
            $crate::logging_facility::sink::Severity::Info => tracing::info!($($arg)+),
            $crate::logging_facility::sink::Severity::Warning => tracing::warn!($($arg)+),
            $crate::logging_facility::sink::Severity::Error => tracing::error!($($arg)+),
            $crate::logging_facility::sink::Severity::Critical => {
                tracing::error!(
                    { dailyelt_core_types::schema::FIELD_CRITICAL } = true,
                    $($arg)+
                )
            }
        }
    };
}

pub(crate) use emit_at;
