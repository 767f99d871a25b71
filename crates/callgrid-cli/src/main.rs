use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "callgrid",
    about = "CallGrid — M/M/c steady-state analysis and stabilization for contact centers",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate the store with reference data and a synthetic call log.
    ///
    /// The generated traffic deliberately overloads the Sales class so a
    /// stabilization pass has something to fix. Same --seed, same log.
    Seed {
        /// Database file
        #[arg(long, default_value = "callgrid.redb")]
        db: PathBuf,
        /// RNG seed for reproducible call logs
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Working days to generate
        #[arg(long, default_value_t = 14)]
        days: u32,
        /// Business hours per day
        #[arg(long, default_value_t = 8)]
        hours: u32,
        /// Calls generated per working minute
        #[arg(long, default_value_t = 5)]
        calls_per_minute: u32,
    },
    /// Print steady-state metrics for every skill class.
    Report {
        /// Database file
        #[arg(long, default_value = "callgrid.redb")]
        db: PathBuf,
        /// Business hours the call log spans (divisor for observed λ)
        #[arg(long, default_value_t = 112.0)]
        window_hours: f64,
        /// Acceptable expected time in system, in minutes
        #[arg(long, default_value_t = 10.0)]
        sla_threshold: f64,
    },
    /// Run a stabilization pass: report, hire the minimal relief agents
    /// for every overloaded class, report again.
    Stabilize {
        /// Database file
        #[arg(long, default_value = "callgrid.redb")]
        db: PathBuf,
        /// Business hours the call log spans (divisor for observed λ)
        #[arg(long, default_value_t = 112.0)]
        window_hours: f64,
        /// Acceptable expected time in system, in minutes
        #[arg(long, default_value_t = 10.0)]
        sla_threshold: f64,
        /// Plan only; do not write any agents
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("callgrid=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed {
            db,
            seed,
            days,
            hours,
            calls_per_minute,
        } => commands::seed::run(&db, seed, days, hours, calls_per_minute),
        Commands::Report {
            db,
            window_hours,
            sla_threshold,
        } => commands::report::run(&db, window_hours, sla_threshold),
        Commands::Stabilize {
            db,
            window_hours,
            sla_threshold,
            dry_run,
        } => commands::stabilize::run(&db, window_hours, sla_threshold, dry_run),
    }
}
