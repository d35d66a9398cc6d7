mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortization::{AmortizeArgs, AprArgs};
use commands::comparison::CompareArgs;
use commands::payoff::PlanArgs;
use commands::red_flags::RedFlagsArgs;

/// Loan amortization, comparison and payoff planning
#[derive(Parser)]
#[command(
    name = "loans",
    version,
    about = "Loan amortization, comparison and payoff planning",
    long_about = "A CLI for loan calculations with decimal precision. Builds amortization \
                  schedules, computes effective APR, compares loans side by side, simulates \
                  snowball/avalanche payoff plans and flags predatory loan terms."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an amortization schedule for one loan
    Amortize(AmortizeArgs),
    /// Effective APR including upfront fees
    Apr(AprArgs),
    /// Compare two or more loans side by side
    Compare(CompareArgs),
    /// Simulate a snowball or avalanche payoff plan
    Plan(PlanArgs),
    /// Check a loan's terms for red flags
    RedFlags(RedFlagsArgs),
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

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("loans=debug,loan_engine_core=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries the results, so logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::Apr(args) => commands::amortization::run_apr(args),
        Commands::Compare(args) => commands::comparison::run_compare(args),
        Commands::Plan(args) => commands::payoff::run_plan(args),
        Commands::RedFlags(args) => commands::red_flags::run_red_flags(args),
        Commands::Version => {
            println!("loans {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
