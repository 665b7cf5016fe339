#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::memory_sink;
use dailyelt_core::call_logger::{CallArgs, CallLogger};
use dailyelt_core::extract::ExtractResult;
use dailyelt_core::logging_facility::Severity;
use dailyelt_core::ElError;

#[test]
fn test_no_inputs_no_outputs_logs_one_line() {
    let sink = memory_sink("calls");
    let f = CallLogger::new(sink.clone()).wrap("f", |(): ()| 7);

    assert_eq!(f.call(()), 7);
    assert_eq!(sink.messages(), vec!["Called f()".to_string()]);
}

#[test]
fn test_failure_result_logged_and_returned_unchanged() {
    let sink = memory_sink("calls");
    let extract = CallLogger::new(sink.clone())
        .log_outputs(true)
        .wrap("extract_mobile_events_data", |(): ()| ExtractResult::failure());

    let result = extract.call(());

    assert_eq!(result, ExtractResult::failure());
    assert_eq!(
        sink.messages(),
        vec![
            "Called extract_mobile_events_data()".to_string(),
            "Finished extract_mobile_events_data()\n    --Output--\n{\n    \"'status'\": \"'FAILURE'\",\n    \"'nrows'\": \"'null'\"\n}".to_string(),
        ]
    );
}

#[test]
fn test_inputs_positional_and_keyword() {
    let sink = memory_sink("calls");
    let logger = CallLogger::new(sink.clone()).log_inputs(true);

    let args = CallArgs::new().arg("pos_system").arg(&3).kwarg("dry_run", &true);
    logger.invoke("extract_data", args, |_| ());

    assert_eq!(
        sink.messages()[0],
        "Called extract_data('pos_system', 3, 'dry_run'=true)"
    );
}

#[test]
fn test_inputs_truncated_per_argument() {
    let sink = memory_sink("calls");
    let logger = CallLogger::new(sink.clone())
        .log_inputs(true)
        .log_inputs_max_len(4);

    logger.invoke("load", ("abcdefgh", 123456789), |_| ());

    assert_eq!(sink.messages()[0], "Called load('abc..., 1234...)");
}

#[test]
fn test_runtime_metrics_only() {
    let sink = memory_sink("calls");
    let logger = CallLogger::new(sink.clone()).log_runtime(true);

    logger.invoke("quick", (), |_| 1);

    let messages = sink.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].starts_with("Finished quick()\n    --Runtime metrics--\n"));
    assert!(messages[1].contains("Total execution time: 0.00 seconds = 0.00 minutes"));
    assert!(!messages[1].contains("--Output--"));
}

#[test]
fn test_error_skips_post_call_message() {
    let sink = memory_sink("calls");
    let dispatch = CallLogger::new(sink.clone())
        .log_inputs(true)
        .log_outputs(true)
        .wrap("extract_data", |(name,): (&str,)| {
            name.parse::<dailyelt_core::Source>()
                .map(|_| ExtractResult::success(1))
        });

    let err = dispatch.try_call(("unknown_src",)).unwrap_err();

    assert_eq!(
        err,
        ElError::UnknownSource {
            source_name: "unknown_src".to_string()
        }
    );
    assert_eq!(
        sink.messages(),
        vec!["Called extract_data('unknown_src')".to_string()]
    );
}

#[test]
fn test_configured_level_applies_to_both_messages() {
    let sink = memory_sink("calls");
    let logger = CallLogger::new(sink.clone())
        .level(Severity::Debug)
        .log_outputs(true);

    logger.invoke("f", (), |_| "done");

    assert!(sink
        .records()
        .iter()
        .all(|(level, _)| *level == Severity::Debug));
}

#[test]
fn test_wrapped_function_keeps_name_and_inner() {
    let sink = memory_sink("calls");
    let double = CallLogger::new(sink).wrap("double", |(x,): (i32,)| x * 2);

    assert_eq!(double.name(), "double");
    assert_eq!((double.inner())((4,)), 8);
}
