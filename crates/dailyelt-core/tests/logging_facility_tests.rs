#![allow(clippy::unwrap_used, clippy::expect_used)]

use dailyelt_core::errors::{ElError, ElErrorKind};
use dailyelt_core::logging_facility::test_capture::init_test_capture;
use dailyelt_core::logging_facility::{LogSink, Severity, SinkRegistry};
use dailyelt_core_types::schema::FIELD_CRITICAL;
use tracing::Level;

#[test]
fn test_sink_events_carry_logger_and_severity() {
    let capture = init_test_capture();
    let sink = SinkRegistry::new()
        .create("test_sink_fields_unique_1")
        .unwrap();

    sink.log(Severity::Warning, "disk almost full");

    let events = capture.events_for("test_sink_fields_unique_1");
    assert_eq!(events.len(), 1, "Should have exactly one event");
    assert_eq!(events[0].level, Level::WARN);
    assert_eq!(events[0].severity.as_deref(), Some("WARNING"));
    assert_eq!(events[0].message.as_deref(), Some("disk almost full"));
}

#[test]
fn test_each_severity_maps_to_tracing_level() {
    let capture = init_test_capture();
    let logger = "test_severity_levels_unique_2";
    let sink = SinkRegistry::new().create(logger).unwrap();

    for severity in [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ] {
        sink.log(severity, severity.as_str());
    }

    let levels: Vec<Level> = capture.events_for(logger).iter().map(|e| e.level).collect();
    assert_eq!(
        levels,
        vec![Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR, Level::ERROR]
    );
}

#[test]
fn test_critical_is_marked() {
    let capture = init_test_capture();
    let logger = "test_critical_unique_3";
    let sink = SinkRegistry::new().create(logger).unwrap();

    sink.log(Severity::Error, "plain error");
    sink.log(Severity::Critical, "system down");

    let events = capture.events_for(logger);
    assert_eq!(events[0].fields.get(FIELD_CRITICAL), None);
    assert_eq!(
        events[1].fields.get(FIELD_CRITICAL),
        Some(&"true".to_string())
    );
    assert_eq!(events[1].severity.as_deref(), Some("CRITICAL"));
}

#[test]
fn test_prefixed_sink_prepends_prefix() {
    let capture = init_test_capture();
    let logger = "test_prefix_unique_4";
    let sink = SinkRegistry::new()
        .create_prefixed(logger, "[extract] ")
        .unwrap();

    sink.log(Severity::Info, "Called extract_data()");

    assert_eq!(
        capture.messages_for(logger),
        vec!["[extract] Called extract_data()".to_string()]
    );
}

#[test]
fn test_duplicate_sink_name_rejected() {
    let mut registry = SinkRegistry::new();
    registry.create("main").unwrap();

    let err = registry.create("main").unwrap_err();
    assert_eq!(err.kind(), ElErrorKind::AlreadyExists);
    assert_eq!(
        err,
        ElError::AlreadyExists {
            resource: "logger main".to_string()
        }
    );
    assert!(registry.contains("main"));
}

#[test]
fn test_test_capture_assert_message_logged() {
    let capture = init_test_capture();
    let logger = "test_capture_assert_unique_5";
    let sink = SinkRegistry::new().create(logger).unwrap();

    sink.log(Severity::Info, "Started section 'Extract'");

    // This should not panic
    capture.assert_message_logged(logger, "Started section");
}

#[test]
#[should_panic(expected = "Expected message containing")]
fn test_test_capture_assert_message_logged_fails() {
    let capture = init_test_capture();

    // This should panic because nothing was logged through this sink
    capture.assert_message_logged("nonexistent_logger_truly_unique_999", "anything");
}

#[test]
fn test_test_capture_count_events() {
    let capture = init_test_capture();
    let logger1 = "test_count_events_l1_unique_6";
    let logger2 = "test_count_events_l2_unique_6";
    let mut registry = SinkRegistry::new();
    let sink1 = registry.create(logger1).unwrap();
    let sink2 = registry.create(logger2).unwrap();

    sink1.log(Severity::Info, "a");
    sink2.log(Severity::Error, "b");
    sink1.log(Severity::Error, "c");

    let error_count = capture.count_events(|e| {
        e.level == Level::ERROR
            && (e.logger.as_deref() == Some(logger1) || e.logger.as_deref() == Some(logger2))
    });
    assert_eq!(error_count, 2);
}
