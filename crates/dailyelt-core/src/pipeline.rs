//! The daily ELT run
//!
//! Ties the section timer and the extractor together:
//!
//! 1. start `Daily ELT process`, then `Extract`
//! 2. extract every configured source over the standard period
//! 3. end `Extract`, then `Daily ELT process`
//!
//! On failure the `FAILED to complete daily ELT process` section is ended at
//! `Error` severity in place of `Daily ELT process`, and the error is logged.
//! With `fail_fast` the first error aborts the run and is returned. Without
//! it every source is attempted and the run returns its summary; the errors
//! stay in the per-source outcomes and [`RunSummary::first_error`] reports
//! that the run failed. A panic inside the run is logged the same way and
//! then resumed.

use crate::config::PipelineConfig;
use crate::errors::{ElError, Result};
use crate::extract::{standard_period, ExtractResult, Extractor, Period};
use crate::logging_facility::{LogSink, Severity, SinkRegistry};
use crate::section_timer::SectionTimer;
use chrono::{DateTime, Utc};
use dailyelt_core_types::schema::{
    SECTION_DAILY_ELT, SECTION_EXTRACT, SECTION_FAILED, SINK_EXTRACT, SINK_MAIN,
};
use dailyelt_core_types::RunId;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// Prefix of every message on the extract sink
pub const EXTRACT_PREFIX: &str = "[extract] ";

/// What one source returned
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    pub source: String,
    pub result: std::result::Result<ExtractResult, ElError>,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: RunId,
    pub period: Period,
    /// One entry per configured source, in call order
    pub outcomes: Vec<SourceOutcome>,
    /// Runtime of the `Daily ELT process` section, or of the `FAILED`
    /// section when a source errored
    pub elapsed: Duration,
}

impl RunSummary {
    /// Results of the sources that returned one
    pub fn results(&self) -> Vec<ExtractResult> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().copied())
            .collect()
    }

    /// Total rows reported by successful sources
    pub fn total_rows(&self) -> u64 {
        self.results().iter().filter_map(|r| r.nrows).sum()
    }

    /// The error of the first source that failed, in call order
    pub fn first_error(&self) -> Option<&ElError> {
        self.outcomes.iter().find_map(|o| o.result.as_ref().err())
    }

    /// No source returned an error
    pub fn is_success(&self) -> bool {
        self.first_error().is_none()
    }
}

/// One daily run
///
/// A pipeline runs once: its sections cannot be restarted, so a second
/// [`Pipeline::run`] fails with [`ElError::AlreadyStarted`].
pub struct Pipeline {
    config: PipelineConfig,
    main_sink: Arc<dyn LogSink>,
    timer: SectionTimer,
    extractor: Extractor,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("timer", &self.timer)
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// # Errors
    ///
    /// [`ElError::Config`] if the configuration is invalid.
    pub fn new(
        config: PipelineConfig,
        main_sink: Arc<dyn LogSink>,
        extract_sink: Arc<dyn LogSink>,
    ) -> Result<Self> {
        config.validate()?;
        let extractor = Extractor::new(extract_sink, config.delay()?);
        Ok(Self {
            timer: SectionTimer::new(main_sink.clone()),
            main_sink,
            config,
            extractor,
        })
    }

    pub fn timer(&self) -> &SectionTimer {
        &self.timer
    }

    /// Run the pipeline for the standard period relative to `now`
    ///
    /// Without `fail_fast`, source errors do not make this return `Err`:
    /// check [`RunSummary::first_error`].
    ///
    /// # Errors
    ///
    /// With `fail_fast`, the first error raised by a source. In either mode,
    /// a section-ordering error (e.g. running the same pipeline twice).
    ///
    /// # Panics
    ///
    /// Re-raises a panic from a source or sink after logging the failure.
    pub fn run(&mut self, now: DateTime<Utc>) -> Result<RunSummary> {
        let run_id = RunId::new();
        let span = tracing::info_span!("daily_elt", run_id = %run_id);
        let _guard = span.enter();

        match panic::catch_unwind(AssertUnwindSafe(|| self.execute(run_id, now))) {
            Ok(result) => result.inspect_err(|err| self.record_failure(err)),
            Err(payload) => {
                self.record_failure(&ElError::Panicked {
                    message: panic_message(payload.as_ref()),
                });
                panic::resume_unwind(payload)
            }
        }
    }

    fn execute(&mut self, run_id: RunId, now: DateTime<Utc>) -> Result<RunSummary> {
        self.timer.section(SECTION_DAILY_ELT).start(Severity::Info)?;

        self.timer.section(SECTION_EXTRACT).start(Severity::Info)?;
        let period = standard_period(now);
        let mut outcomes = Vec::with_capacity(self.config.sources.len());
        for source in &self.config.sources {
            let result = self.extractor.extract_data(source, period);
            if let Err(err) = &result {
                if self.config.fail_fast {
                    return Err(err.clone());
                }
                self.main_sink.log(
                    Severity::Error,
                    &format!("Extraction from '{}' failed: {}", source, err),
                );
            }
            outcomes.push(SourceOutcome {
                source: source.clone(),
                result,
            });
        }
        self.timer.section(SECTION_EXTRACT).end(Severity::Info)?;

        let summary = RunSummary {
            run_id,
            period,
            outcomes,
            elapsed: Duration::ZERO,
        };
        let elapsed = match summary.first_error() {
            Some(err) => {
                self.record_failure(err);
                self.timer.elapsed(SECTION_FAILED).unwrap_or_default()
            }
            None => self.timer.section(SECTION_DAILY_ELT).end(Severity::Info)?,
        };
        Ok(RunSummary { elapsed, ..summary })
    }

    fn record_failure(&mut self, err: &ElError) {
        let timed = self
            .timer
            .section(SECTION_FAILED)
            .started_with(SECTION_DAILY_ELT)
            .and_then(|timer| timer.end(Severity::Error));
        if let Err(timer_err) = timed {
            self.main_sink.log(
                Severity::Error,
                &format!("Could not time the failed run: {}", timer_err),
            );
        }
        self.main_sink.log(
            Severity::Error,
            &format!("Error in daily ELT process: {} [{}]", err, err.code()),
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Run the daily pipeline with tracing sinks created from `registry`
///
/// # Errors
///
/// [`ElError::AlreadyExists`] if the `main` or `extract` sink was already
/// created, otherwise as [`Pipeline::run`].
pub fn run_daily(
    config: PipelineConfig,
    registry: &mut SinkRegistry,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let main_sink = registry.create(SINK_MAIN)?;
    let extract_sink = registry.create_prefixed(SINK_EXTRACT, EXTRACT_PREFIX)?;
    Pipeline::new(config, main_sink, extract_sink)?.run(now)
}
