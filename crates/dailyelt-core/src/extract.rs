//! Extraction from the raw data sources
//!
//! The sources are stubs: each one sleeps for a simulated latency and
//! returns a fixed status/row-count result. Every call goes through the call
//! logger on the `extract` sink.

use crate::call_logger::CallLogger;
use crate::errors::{ElError, Result};
use crate::format::{LogValue, ToLogValue};
use crate::logging_facility::LogSink;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// A named upstream system the pipeline pulls raw data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    PosSystem,
    MobileEvents,
    WebEvents,
}

impl Source {
    /// Every source, in the order the daily run extracts them
    pub const ALL: [Source; 3] = [Source::PosSystem, Source::MobileEvents, Source::WebEvents];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::PosSystem => "pos_system",
            Source::MobileEvents => "mobile_events",
            Source::WebEvents => "web_events",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ElError;

    fn from_str(s: &str) -> Result<Self> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| ElError::UnknownSource {
                source_name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExtractStatus {
    Success,
    Failure,
}

impl ExtractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractStatus::Success => "SUCCESS",
            ExtractStatus::Failure => "FAILURE",
        }
    }
}

/// Status and row count reported by a source
///
/// A `Failure` status is data, not an error: it is logged and returned like
/// any other result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResult {
    pub status: ExtractStatus,
    pub nrows: Option<u64>,
}

impl ExtractResult {
    pub fn success(nrows: u64) -> Self {
        Self {
            status: ExtractStatus::Success,
            nrows: Some(nrows),
        }
    }

    pub fn failure() -> Self {
        Self {
            status: ExtractStatus::Failure,
            nrows: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExtractStatus::Success
    }
}

impl ToLogValue for ExtractResult {
    fn to_log_value(&self) -> LogValue {
        LogValue::map([
            ("status", self.status.as_str().to_log_value()),
            ("nrows", self.nrows.to_log_value()),
        ])
    }
}

/// The daily extraction window, start inclusive and end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The previous UTC calendar day relative to `now`
pub fn standard_period(now: DateTime<Utc>) -> Period {
    let end = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
    Period {
        start: end - chrono::Duration::days(1),
        end,
    }
}

/// Simulated latency of a source call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min_ms: u64,
    max_ms: u64,
}

impl DelayRange {
    /// # Errors
    ///
    /// Returns [`ElError::Config`] if `min_ms > max_ms`.
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self> {
        if min_ms > max_ms {
            return Err(ElError::Config {
                reason: format!(
                    "min_delay_ms ({}) must not exceed max_delay_ms ({})",
                    min_ms, max_ms
                ),
            });
        }
        Ok(Self { min_ms, max_ms })
    }

    /// No simulated latency at all
    pub fn none() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }

    /// `(min, max)` in milliseconds
    pub fn bounds_ms(&self) -> (u64, u64) {
        (self.min_ms, self.max_ms)
    }

    pub fn sample(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.min_ms..=self.max_ms))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_ms: 1_000,
            max_ms: 5_000,
        }
    }
}

/// Logged access to the stub sources
pub struct Extractor {
    source_calls: CallLogger,
    dispatch_calls: CallLogger,
    delay: DelayRange,
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("source_calls", &self.source_calls)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl Extractor {
    pub fn new(sink: Arc<dyn LogSink>, delay: DelayRange) -> Self {
        let source_calls = CallLogger::new(sink).log_outputs(true);
        let dispatch_calls = source_calls.clone().log_inputs(true);
        Self {
            source_calls,
            dispatch_calls,
            delay,
        }
    }

    /// Extract data from the point-of-sale system
    pub fn extract_from_pos_system(&self, period: Period) -> ExtractResult {
        self.source_calls
            .invoke("extract_from_pos_system", (period.start, period.end), |_| {
                self.simulate_latency();
                ExtractResult::success(6_239)
            })
    }

    /// Extract mobile events data
    pub fn extract_mobile_events_data(&self, period: Period) -> ExtractResult {
        self.source_calls
            .invoke("extract_mobile_events_data", (period.start, period.end), |_| {
                self.simulate_latency();
                ExtractResult::failure()
            })
    }

    /// Extract web events data
    pub fn extract_web_events_data(&self, period: Period) -> ExtractResult {
        self.source_calls
            .invoke("extract_web_events_data", (period.start, period.end), |_| {
                self.simulate_latency();
                ExtractResult::success(867_111)
            })
    }

    /// Route `source_name` to its source and return the source's result
    ///
    /// # Errors
    ///
    /// Returns [`ElError::UnknownSource`] for names outside [`Source::ALL`].
    pub fn extract_data(&self, source_name: &str, period: Period) -> Result<ExtractResult> {
        self.dispatch_calls.try_invoke(
            "extract_data",
            (source_name, period.start, period.end),
            |(source_name, _, _)| -> Result<ExtractResult> {
                let result = match source_name.parse::<Source>()? {
                    Source::PosSystem => self.extract_from_pos_system(period),
                    Source::MobileEvents => self.extract_mobile_events_data(period),
                    Source::WebEvents => self.extract_web_events_data(period),
                };
                Ok(result)
            },
        )
    }

    fn simulate_latency(&self) {
        let delay = self.delay.sample();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
