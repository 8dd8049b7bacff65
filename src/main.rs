//! Access-control scenario simulator.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────┐
//!   │                          access-sim                            │
//!   │                                                                │
//!   │  ┌──────────┐    ┌──────────────┐    ┌──────────────────────┐  │
//!   │  │  config  │───▶│  scenarios   │───▶│       runner         │  │
//!   │  │ (TOML or │    │  catalog     │    │ sequential/concurrent│  │
//!   │  │ built-in)│    └──────────────┘    └──────────┬───────────┘  │
//!   │  └──────────┘                                   │              │
//!   │                                                 ▼              │
//!   │                                   ┌──────────────────────────┐ │
//!   │                                   │  resilience::orchestrator│ │
//!   │                                   │  timeout / retry /       │ │
//!   │                                   │  fallback                │ │
//!   │                                   └──────────┬───────────────┘ │
//!   │                                              ▼                 │
//!   │                                   ┌──────────────────────────┐ │
//!   │                                   │ simulation::delay        │ │
//!   │                                   │ random latency + failure │ │
//!   │                                   └──────────────────────────┘ │
//!   │                                                                │
//!   │  report → stdout              observability → stderr/metrics   │
//!   └────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::PathBuf;

use clap::Parser;

use access_sim::config::{load_config, ReportFormat, RunMode, SimConfig};
use access_sim::observability::logging::init_logging;
use access_sim::report::{write_reports, write_summaries};
use access_sim::runner::ScenarioRunner;
use access_sim::scenarios::Scenario;

#[derive(Parser)]
#[command(name = "access-sim")]
#[command(about = "Run simulated access-control checks under retry, timeout and fallback policies", long_about = None)]
struct Cli {
    /// TOML configuration file. The built-in scenarios are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format.
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Run the suite this many times and print a summary per scenario.
    #[arg(short, long)]
    iterations: Option<u32>,

    /// Run scenarios concurrently instead of one after another.
    #[arg(long)]
    concurrent: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };
    if let Some(format) = cli.format {
        config.runner.format = format;
    }
    if let Some(iterations) = cli.iterations {
        config.runner.iterations = iterations.max(1);
    }
    if cli.concurrent {
        config.runner.mode = RunMode::Concurrent;
    }

    init_logging(&config.observability);

    tracing::info!(
        scenarios = config.scenarios.len(),
        mode = ?config.runner.mode,
        iterations = config.runner.iterations,
        "Configuration loaded"
    );

    let scenarios: Vec<Scenario> = config.scenarios.iter().map(Scenario::from_config).collect();
    let runner = ScenarioRunner::new(config.runner.mode);

    if config.runner.iterations > 1 {
        let summaries = runner.run_repeated(&scenarios, config.runner.iterations).await;
        write_summaries(&mut io::stdout().lock(), &summaries, config.runner.format)?;
    } else {
        let reports = runner.run_all(&scenarios).await;
        write_reports(&mut io::stdout().lock(), &reports, config.runner.format)?;
    }

    tracing::info!("Simulation complete");
    Ok(())
}
