mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::dashboard::{ControlArgs, DashboardArgs};
use commands::deal::OutcomeArgs;

/// IPO outcomes for a convertible note and a secondary share block
#[derive(Parser)]
#[command(
    name = "ipo-deal",
    version,
    about = "IPO outcomes for a convertible note and a secondary share block",
    long_about = "Computes accrued interest, conversion proceeds, profit, MOIC and \
                  annualised return for a convertible note with a price floor and a \
                  block of secondary shares, for a chosen IPO share price."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate both instruments at an IPO price
    Outcome(OutcomeArgs),
    /// Cash-flow waterfall at an IPO price
    Waterfall(OutcomeArgs),
    /// Headline metrics, waterfall and narrative at an IPO price
    Dashboard(DashboardArgs),
    /// Describe the IPO price control
    Control(ControlArgs),
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
    let default_filter = if verbose {
        "ipo_deal=debug,ipo_deal_core=debug"
    } else {
        "ipo_deal=warn,ipo_deal_core=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout carries the result document
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Outcome(args) => commands::deal::run_outcome(args),
        Commands::Waterfall(args) => commands::deal::run_waterfall(args),
        Commands::Dashboard(args) => commands::dashboard::run_dashboard(args),
        Commands::Control(args) => commands::dashboard::run_control(args),
        Commands::Version => {
            println!("ipo-deal {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
