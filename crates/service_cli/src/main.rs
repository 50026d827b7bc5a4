//! Utility proration CLI entry point.

use clap::{Parser, Subcommand};
use proration_core::cycle::CycleEstimate;
use proration_core::types::{Date, EndDateConvention};
use rust_decimal::Decimal;
use service_cli::config::{build_settings, CliArgs, RunFile, Settings};
use service_cli::{commands, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prorate utility invoices over an occupant's stay
#[derive(Parser)]
#[command(name = "prorate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run file path (TOML)
    #[arg(
        short,
        long,
        global = true,
        env = "PRORATE_CONFIG",
        default_value = "prorate.toml"
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prorate every utility series in the run file and print the statement
    Run {
        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Validate the run file and report gaps or overlaps between invoices
    Check,

    /// Extrapolate a full billing-cycle invoice from its first payment
    Cycle {
        /// Amount paid for the first part of the cycle
        #[arg(long)]
        first_payment: Decimal,

        /// Days covered by the first payment
        #[arg(long)]
        first_days: i64,

        /// First day of the cycle (YYYY-MM-DD)
        #[arg(long)]
        start: Date,

        /// Calendar days in the whole cycle
        #[arg(long)]
        total_days: i64,

        /// End-date convention of the provider (inclusive, exclusive)
        #[arg(long, default_value = "inclusive")]
        convention: EndDateConvention,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolve settings and start logging
fn init(run_file: Option<&RunFile>, args: &CliArgs) -> Result<Settings> {
    let settings = build_settings(run_file, args)?;
    init_tracing(settings.log_level.as_filter_str());
    info!("prorate v{}", service_cli::VERSION);
    Ok(settings)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut args = CliArgs {
        log_level: cli.log_level.clone(),
        format: None,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Run { format } => {
            args.format = format;
            let run_file = RunFile::load(&cli.config)?;
            let settings = init(Some(&run_file), &args)?;
            commands::run::run(&run_file, settings.format)
        }
        Commands::Check => {
            let run_file = RunFile::load(&cli.config)?;
            init(Some(&run_file), &args)?;
            commands::check::run(&run_file)
        }
        Commands::Cycle {
            first_payment,
            first_days,
            start,
            total_days,
            convention,
        } => {
            init(None, &args)?;
            let estimate = CycleEstimate {
                first_payment,
                days_in_first_period: first_days,
                cycle_start: start,
                total_calendar_days: total_days,
            };
            commands::cycle::run(&estimate, convention)
        }
    }
}
