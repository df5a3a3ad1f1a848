mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::escrow::EscrowArgs;
use commands::schedule::ScheduleArgs;

/// Mortgage amortisation schedules and scenario comparison
#[derive(Parser)]
#[command(
    name = "mcmp",
    version,
    about = "Mortgage amortisation schedules and scenario comparison",
    long_about = "A CLI for computing month-by-month mortgage amortisation \
                  schedules with decimal precision. Supports recurring extra \
                  payments, one-off special payments, escrow growth projection, \
                  and side-by-side comparison of two payment scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a full amortisation schedule with its escrow column
    Schedule(ScheduleArgs),
    /// Project the monthly escrow series on its own
    Escrow(EscrowArgs),
    /// Compare two payment scenarios side by side
    Compare(CompareArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Escrow(args) => commands::escrow::run_escrow(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Version => {
            println!("mcmp {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
