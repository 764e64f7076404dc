//! # regtally CLI entry point
//!
//! Parses command-line arguments, initializes logging and dispatches to the
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use regtally_cli::composition::{run_composition, CompositionArgs};
use regtally_cli::hierarchy::{run_hierarchy, HierarchyArgs};
use regtally_cli::output::OutputFormat;
use regtally_cli::snapshot::{run_snapshot, SnapshotArgs};
use regtally_cli::trend::{run_trend, TrendArgs};

/// regtally — regulatory word counts from the eCFR
///
/// Measures how much Code of Federal Regulations text each federal agency
/// is responsible for, at one date or across years.
#[derive(Parser, Debug)]
#[command(name = "regtally", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML analysis configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the agency hierarchy.
    Hierarchy(HierarchyArgs),

    /// Word counts per agency and title as of one date.
    Snapshot(SnapshotArgs),

    /// Per-agency word counts across a range of years.
    Trend(TrendArgs),

    /// One agency's footprint broken down by title.
    Composition(CompositionArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "regtally starting");

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Hierarchy(args) => run_hierarchy(args, config, cli.format).await,
        Commands::Snapshot(args) => run_snapshot(args, config, cli.format).await,
        Commands::Trend(args) => run_trend(args, config, cli.format).await,
        Commands::Composition(args) => run_composition(args, config, cli.format).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
