//! Period command
//!
//! Usage: dailyelt period [--now <RFC3339>]

use chrono::{DateTime, Utc};
use clap::Args;
use dailyelt_core::extract::standard_period;

#[derive(Debug, Args)]
pub struct PeriodArgs {
    /// Reference time (defaults to the current time)
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,
}

/// Execute period command
pub fn execute(args: PeriodArgs) -> anyhow::Result<()> {
    let period = standard_period(args.now.unwrap_or_else(Utc::now));
    println!("start_incl: {}", period.start.to_rfc3339());
    println!("end_excl:   {}", period.end.to_rfc3339());
    Ok(())
}
