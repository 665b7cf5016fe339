//! dailyelt CLI
//!
//! Command-line entrypoint for the daily ELT process

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "dailyelt")]
#[command(about = "dailyelt - Daily extract/load pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the daily ELT process
    Run(commands::run::RunArgs),
    /// Print the standard extraction window
    Period(commands::period::PeriodArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Period(args) => commands::period::execute(args),
    };

    if let Err(e) = result {
        tracing::error!(error = ?e, "Command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
