use chrono::{DateTime, TimeZone, Utc};
use dailyelt_core::extract::{DelayRange, Extractor, Period};
use dailyelt_core::logging_facility::MemorySink;
use std::sync::Arc;

/// Create a named in-memory sink for assertions
#[allow(dead_code)]
pub fn memory_sink(name: &str) -> Arc<MemorySink> {
    Arc::new(MemorySink::new(name))
}

/// Create an extractor without simulated latency, logging into a fresh sink
#[allow(dead_code)]
pub fn quiet_extractor() -> (Arc<MemorySink>, Extractor) {
    let sink = memory_sink("extract");
    let extractor = Extractor::new(sink.clone(), DelayRange::none());
    (sink, extractor)
}

/// A fixed reference time: 2024-03-01 13:45 UTC
#[allow(dead_code)]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 13, 45, 0).unwrap()
}

/// The standard period for [`fixed_now`]: all of 2024-02-29
#[allow(dead_code)]
pub fn fixed_period() -> Period {
    Period {
        start: Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    }
}
