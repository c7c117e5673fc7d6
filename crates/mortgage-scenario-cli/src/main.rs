mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use mortgage_scenario_core::config::RateTable;

use commands::insurance::PremiumArgs;
use commands::land_transfer::LandTransferArgs;
use commands::payment::LoanArgs;
use commands::scenario::{AnalyseArgs, CompareArgs, ScenarioArgs};

/// Mortgage scenario calculations
#[derive(Parser)]
#[command(
    name = "msc",
    version,
    about = "Compare mortgage financing scenarios for a home purchase",
    long_about = "Computes default-insurance premiums, periodic payments, amortization \
                  schedules, land transfer tax, carrying costs and cash to close, with \
                  decimal precision. Rate tables default to Ontario / City of Toronto."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Rate table file (YAML or JSON) replacing the built-in Ontario figures
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine decisions to stderr (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Mortgage default insurance premium for a down payment
    Premium(PremiumArgs),
    /// Periodic payment for a loan
    Payment(LoanArgs),
    /// Year-by-year amortization schedule
    Amortization(LoanArgs),
    /// Provincial and municipal land transfer tax
    LandTransferTax(LandTransferArgs),
    /// One financing scenario in full
    Scenario(ScenarioArgs),
    /// Side-by-side comparison of down payments at one price
    Compare(CompareArgs),
    /// Full purchase analysis from a JSON description
    Analyse(AnalyseArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let table = match cli.config.as_deref() {
        Some(path) => match input::file::read_rate_table(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                process::exit(1);
            }
        },
        None => RateTable::default(),
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Premium(args) => commands::insurance::run_premium(args, &table),
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Amortization(args) => commands::payment::run_amortization(args),
        Commands::LandTransferTax(args) => {
            commands::land_transfer::run_land_transfer_tax(args, &table)
        }
        Commands::Scenario(args) => commands::scenario::run_scenario(args, &table),
        Commands::Compare(args) => commands::scenario::run_compare(args, &table),
        Commands::Analyse(args) => commands::scenario::run_analyse(args, &table),
        Commands::Version => {
            println!("msc {}", env!("CARGO_PKG_VERSION"));
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
