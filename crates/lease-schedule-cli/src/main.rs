mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::cadence::CadenceArgs;
use commands::legacy::LegacyScheduleArgs;
use commands::present_value::PresentValueArgs;
use commands::schedule::ScheduleArgs;

/// ASC 842 / IFRS 16 lease amortization schedules
#[derive(Parser)]
#[command(
    name = "lsched",
    version,
    about = "ASC 842 / IFRS 16 lease amortization schedules",
    long_about = "Generates lease liability and right-of-use asset schedules from a \
                  lease's payment calendar with decimal precision. Supports ASC 842 \
                  finance and operating leases and the IFRS 16 single lessee model."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// TOML file overriding engine settings (precision, tolerances, cadence thresholds)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an amortization schedule from a lease and its payments
    Schedule(ScheduleArgs),
    /// Present value of a payment calendar
    PresentValue(PresentValueArgs),
    /// Infer the payment cadence of a calendar
    Cadence(CadenceArgs),
    /// Generate a schedule from term, payment and frequency
    LegacySchedule(LegacyScheduleArgs),
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

/// Logs go to stderr so stdout carries only the formatted result.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = || input::config::load_config(cli.config.as_deref());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => {
            config().and_then(|c| commands::schedule::run_schedule(args, &c))
        }
        Commands::PresentValue(args) => {
            config().and_then(|c| commands::present_value::run_present_value(args, &c))
        }
        Commands::Cadence(args) => config().and_then(|c| commands::cadence::run_cadence(args, &c)),
        Commands::LegacySchedule(args) => {
            config().and_then(|c| commands::legacy::run_legacy_schedule(args, &c))
        }
        Commands::Version => {
            println!("lsched {}", env!("CARGO_PKG_VERSION"));
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
