#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{fixed_now, fixed_period, memory_sink};
use dailyelt_core::logging_facility::test_capture::init_test_capture;
use dailyelt_core::logging_facility::{Severity, SinkRegistry};
use dailyelt_core::{run_daily, ElError, Pipeline, PipelineConfig};
use dailyelt_core_types::schema::{
    SECTION_DAILY_ELT, SECTION_EXTRACT, SECTION_FAILED, SINK_EXTRACT, SINK_MAIN,
};

#[test]
fn test_run_daily_logs_through_main_and_extract_sinks() {
    let capture = init_test_capture();
    let mut registry = SinkRegistry::new();

    let summary = run_daily(
        PipelineConfig::default().without_delay(),
        &mut registry,
        fixed_now(),
    )
    .unwrap();

    assert_eq!(summary.period, fixed_period());
    assert_eq!(summary.outcomes.len(), 3);
    assert_eq!(summary.total_rows(), 873_350);

    let main = capture.messages_for(SINK_MAIN);
    assert_eq!(main[0], "Started section 'Daily ELT process'");
    assert_eq!(main[1], "Started section 'Extract'");
    assert!(main[2].starts_with("Finished section 'Extract' (total runtime"));
    assert!(main[3].starts_with("Finished section 'Daily ELT process' (total runtime"));

    let extract = capture.messages_for(SINK_EXTRACT);
    assert_eq!(extract.len(), 12);
    assert!(extract.iter().all(|m| m.starts_with("[extract] ")));
    capture.assert_message_logged(SINK_EXTRACT, "Called extract_mobile_events_data()");

    // Sinks are registered once per registry
    let err = run_daily(PipelineConfig::default(), &mut registry, fixed_now()).unwrap_err();
    assert_eq!(
        err,
        ElError::AlreadyExists {
            resource: format!("logger {}", SINK_MAIN)
        }
    );
}

#[test]
fn test_failed_run_reports_failure_section_and_error() {
    let main = memory_sink("main");
    let extract = memory_sink("extract");
    let config = PipelineConfig {
        sources: vec!["pos_system".into(), "unknown_src".into()],
        ..PipelineConfig::default()
    }
    .without_delay();
    let mut pipeline = Pipeline::new(config, main.clone(), extract.clone()).unwrap();

    let err = pipeline.run(fixed_now()).unwrap_err();
    assert_eq!(err.code(), "ERR_UNKNOWN_SOURCE");

    let records = main.records();
    let levels: Vec<Severity> = records.iter().map(|(level, _)| *level).collect();
    assert_eq!(
        levels,
        vec![Severity::Info, Severity::Info, Severity::Error, Severity::Error]
    );
    assert!(records[2]
        .1
        .starts_with("Finished section 'FAILED to complete daily ELT process'"));
    assert_eq!(
        records[3].1,
        "Error in daily ELT process: Unknown source_name: unknown_src [ERR_UNKNOWN_SOURCE]"
    );
}

#[test]
fn test_keep_going_summary_lists_every_source() {
    let config = PipelineConfig {
        sources: vec!["mobile_events".into(), "web_events".into()],
        fail_fast: false,
        ..PipelineConfig::default()
    }
    .without_delay();
    let mut pipeline =
        Pipeline::new(config, memory_sink("main"), memory_sink("extract")).unwrap();

    let summary = pipeline.run(fixed_now()).unwrap();

    let sources: Vec<&str> = summary.outcomes.iter().map(|o| o.source.as_str()).collect();
    assert_eq!(sources, vec!["mobile_events", "web_events"]);
    assert_eq!(summary.total_rows(), 867_111);
    assert!(!summary.results()[0].is_success());
}

#[test]
fn test_keep_going_returns_good_results_with_failure() {
    let main = memory_sink("main");
    let config = PipelineConfig {
        sources: vec!["pos_system".into(), "unknown_src".into(), "web_events".into()],
        fail_fast: false,
        ..PipelineConfig::default()
    }
    .without_delay();
    let mut pipeline = Pipeline::new(config, main.clone(), memory_sink("extract")).unwrap();

    let summary = pipeline.run(fixed_now()).unwrap();

    assert!(!summary.is_success());
    assert_eq!(
        summary.first_error(),
        Some(&ElError::UnknownSource {
            source_name: "unknown_src".to_string()
        })
    );
    assert_eq!(summary.outcomes.len(), 3);
    assert_eq!(summary.results().len(), 2);
    assert_eq!(summary.total_rows(), 6_239 + 867_111);

    assert!(pipeline.timer().is_ended(SECTION_EXTRACT));
    assert!(pipeline.timer().is_ended(SECTION_FAILED));
    assert!(!pipeline.timer().is_ended(SECTION_DAILY_ELT));
    assert_eq!(
        main.messages().last().unwrap(),
        "Error in daily ELT process: Unknown source_name: unknown_src [ERR_UNKNOWN_SOURCE]"
    );
}
