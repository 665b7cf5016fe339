//! CLI run integration tests
//!
//! These tests run the `dailyelt` binary end to end with the simulated
//! source latency disabled.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn dailyelt(temp_dir: &TempDir, args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_dailyelt");
    Command::new(cli_bin)
        .current_dir(temp_dir.path())
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_run_succeeds() {
    // Scenario: the stock daily run
    // When: `dailyelt run --no-delay`
    // Then: exit status 0, every section logged, summary printed
    let temp_dir = TempDir::new().unwrap();

    let output = dailyelt(&temp_dir, &["run", "--no-delay"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "CLI should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Started section 'Daily ELT process'"));
    assert!(stdout.contains("Finished section 'Extract'"));
    assert!(stdout.contains("web_events: SUCCESS (867111 rows)"));
    assert!(stdout.contains("mobile_events: FAILURE (- rows)"));
}

#[test]
fn test_cli_run_unknown_source_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = dailyelt(
        &temp_dir,
        &["run", "--no-delay", "--source", "pos_system", "--source", "unknown_src"],
    );

    assert!(!output.status.success(), "Unknown source should fail the run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown source_name: unknown_src"),
        "stderr should name the source: {}",
        stderr
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FAILED to complete daily ELT process"));
}

#[test]
fn test_cli_run_writes_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("main.log");

    let output = dailyelt(
        &temp_dir,
        &[
            "run",
            "--no-delay",
            "--source",
            "web_events",
            "--log-file",
            log_path.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    let contents = fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("Started section 'Daily ELT process'"));
    assert!(contents.contains("[extract] Called extract_web_events_data()"));
}

#[test]
fn test_cli_run_reads_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dailyelt.toml");
    fs::write(
        &config_path,
        "sources = [\"pos_system\"]\nmin_delay_ms = 0\nmax_delay_ms = 0\n",
    )
    .unwrap();

    let output = dailyelt(
        &temp_dir,
        &["run", "--config", config_path.to_str().unwrap()],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pos_system: SUCCESS (6239 rows)"));
    assert!(!stdout.contains("web_events:"));
}

#[test]
fn test_cli_run_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("dailyelt.toml");
    fs::write(&config_path, "min_delay_ms = 10\nmax_delay_ms = 1\n").unwrap();

    let output = dailyelt(
        &temp_dir,
        &["run", "--config", config_path.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load config"));
}

#[test]
fn test_cli_period() {
    let temp_dir = TempDir::new().unwrap();

    let output = dailyelt(&temp_dir, &["period", "--now", "2024-03-01T13:45:00Z"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("start_incl: 2024-02-29T00:00:00+00:00"));
    assert!(stdout.contains("end_excl:   2024-03-01T00:00:00+00:00"));
}

#[test]
fn test_cli_keep_going_reports_every_source_and_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = dailyelt(
        &temp_dir,
        &[
            "run",
            "--no-delay",
            "--keep-going",
            "--source",
            "pos_system",
            "--source",
            "unknown_src",
            "--source",
            "web_events",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pos_system: SUCCESS (6239 rows)"));
    assert!(stdout.contains("unknown_src: ERROR (Unknown source_name: unknown_src)"));
    assert!(stdout.contains("web_events: SUCCESS (867111 rows)"));
    assert!(stdout.contains("Finished section 'Extract'"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("daily ELT process failed"));
}

#[test]
fn test_cli_failed_run_logged_once_by_pipeline() {
    let temp_dir = TempDir::new().unwrap();

    let output = dailyelt(&temp_dir, &["run", "--no-delay", "--source", "unknown_src"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Error in daily ELT process").count(), 1);
    assert!(stdout.contains("Command failed"));
}

#[test]
fn test_cli_rejects_test_profile() {
    let temp_dir = TempDir::new().unwrap();

    let output = dailyelt(&temp_dir, &["run", "--no-delay", "--profile", "test"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("reserved for the test suite"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Started section"));
}
