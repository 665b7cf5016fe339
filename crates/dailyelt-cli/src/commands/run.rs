//! Run command
//!
//! Usage: dailyelt run [--config <PATH>] [--profile <PROFILE>] [--log-file <PATH>]
//!                     [--source <NAME>]... [--no-delay] [--keep-going]

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use dailyelt_core::logging_facility::{init, Profile, SinkRegistry};
use dailyelt_core::{run_daily, PipelineConfig};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to a TOML pipeline configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logging profile: development or production
    #[arg(long)]
    pub profile: Option<Profile>,

    /// Also append log lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Source to extract (repeatable); replaces the configured list
    #[arg(long = "source")]
    pub sources: Vec<String>,

    /// Skip the simulated source latency
    #[arg(long)]
    pub no_delay: bool,

    /// Attempt every source even after one fails
    #[arg(long)]
    pub keep_going: bool,
}

/// Execute run command
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let config = build_config(args)?;

    init(config.profile, config.log_file.as_deref()).context("failed to initialize logging")?;
    install_panic_hook();

    let mut registry = SinkRegistry::new();
    let summary =
        run_daily(config, &mut registry, Utc::now()).context("daily ELT process failed")?;

    println!(
        "Run {} {} in {:.2}s ({} to {})",
        summary.run_id,
        if summary.is_success() { "finished" } else { "failed" },
        summary.elapsed.as_secs_f64(),
        summary.period.start.to_rfc3339(),
        summary.period.end.to_rfc3339()
    );
    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(result) => {
                let nrows = result
                    .nrows
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("  {}: {} ({} rows)", outcome.source, result.status.as_str(), nrows);
            }
            Err(err) => println!("  {}: ERROR ({})", outcome.source, err),
        }
    }

    match summary.first_error() {
        Some(err) => Err(anyhow::Error::new(err.clone()).context("daily ELT process failed")),
        None => Ok(()),
    }
}

fn build_config(args: RunArgs) -> anyhow::Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(profile) = args.profile {
        config.profile = profile;
    }
    if args.log_file.is_some() {
        config.log_file = args.log_file;
    }
    if !args.sources.is_empty() {
        config.sources = args.sources;
    }
    if args.keep_going {
        config.fail_fast = false;
    }
    if args.no_delay {
        config = config.without_delay();
    }
    if config.profile == Profile::Test {
        anyhow::bail!("logging profile 'test' is reserved for the test suite");
    }
    config.validate()?;
    Ok(config)
}

/// Log uncaught panics through tracing before the default hook prints them
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "Uncaught panic");
        default_hook(info);
    }));
}
