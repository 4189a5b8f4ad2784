//! # RPC Conformance CLI
//!
//! Runs a built-in suite against the in-memory reference category service
//! and prints the report. Exits with status 1 when any check does not pass.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use rpc_conformance::config::{ConfigOverrides, HarnessConfig};
use rpc_conformance::logging::{init_logging_with_level, route_panics_to_tracing};
use rpc_conformance::reference::{OPERATIONS, STATUS_OK};
use rpc_conformance::suites::{run_reference_suite, Suite};
use rpc_conformance::ReportFormat;

#[derive(Parser)]
#[command(name = "rpc-conformance")]
#[command(about = "Run request/response conformance checks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file (default: ./rpc-conformance.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long)]
    format: Option<String>,

    /// Execution mode (sequential, concurrent)
    #[arg(long)]
    mode: Option<String>,

    /// Per-call timeout in milliseconds (0 disables)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a suite against the in-memory reference service
    Run {
        /// Suite name (status, categories, smoke)
        #[arg(default_value = "smoke")]
        suite: String,

        /// Status the reference service reports from GetStatus
        #[arg(long, default_value = STATUS_OK)]
        status: String,
    },

    /// List built-in suites and their checks
    Suites,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let mut cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    init_logging_with_level(level);
    route_panics_to_tracing();

    let command = cli.command.take().unwrap_or(Commands::Run {
        suite: Suite::Smoke.to_string(),
        status: STATUS_OK.to_string(),
    });

    match command {
        Commands::Suites => {
            list_suites()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { suite, status } => {
            if run_suite(&cli, &suite, &status).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn list_suites() -> Result<()> {
    println!("reference operations: {}", OPERATIONS.join(", "));
    for suite in Suite::ALL {
        println!("{suite}");
        for check in suite.checks()? {
            println!("  {}", check.label());
        }
    }
    Ok(())
}

async fn run_suite(cli: &Cli, suite: &str, status: &str) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load_from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => HarnessConfig::load().context("failed to load configuration")?,
    };

    let overrides = ConfigOverrides {
        format: cli.format.clone(),
        mode: cli.mode.clone(),
        call_timeout_ms: cli.timeout_ms,
        verbose: cli.verbose > 0,
    };
    overrides.apply(&mut config)?;

    let report = run_reference_suite(suite.parse()?, status, &config).await?;

    let reporter = config.output.format.reporter(config.output.verbose);
    print!("{}", reporter.render(&report)?);
    if config.output.format == ReportFormat::Json {
        println!();
    }

    Ok(report.all_passed())
}
