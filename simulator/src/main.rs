// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Input-Selection Simulator
//!
//! Entry point for the `nova-selection-sim` binary. Parses CLI arguments,
//! initializes logging, runs one simulated wallet per seed on tokio's
//! blocking pool, and prints the merged report.
//!
//! The binary supports three subcommands:
//!
//! - `run`     — simulate one policy
//! - `compare` — simulate every policy on the same seeds
//! - `version` — print build version information

mod cli;
mod logging;
mod metrics;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use nova_selection::config::SimulationConfig;
use nova_selection::env::TxHash;
use nova_selection::policy::{Fallback, InputPolicy, LargestFirst, RandomImprove};
use nova_selection::simulation::{simulate_many, SimulationReport};
use nova_selection::utxo::SortedUtxo;

use cli::{Commands, NovaSimCli, PolicyKind, SimArgs};
use metrics::SimMetrics;

type Sorted = SortedUtxo<TxHash, String>;

/// What `run --json` prints.
#[derive(Serialize)]
struct JsonReport<'a> {
    policy: &'a str,
    seeds: std::ops::Range<u64>,
    config: &'a SimulationConfig,
    report: &'a SimulationReport,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = NovaSimCli::parse();

    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Compare(args) => compare(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn init(args: &SimArgs) -> Result<SimulationConfig> {
    logging::init_logging(&args.log_level, args.log_format);

    let config = args.to_config();
    config.validate().context("invalid simulation parameters")?;
    Ok(config)
}

fn policy_name(kind: PolicyKind, config: &SimulationConfig) -> String {
    match kind {
        PolicyKind::LargestFirst => "largest-first".to_string(),
        PolicyKind::RandomImprove => {
            format!("random-improve(max {}) / largest-first", config.max_inputs)
        }
    }
}

/// Runs every seed of `args` under `kind`.
async fn simulate_policy(
    kind: PolicyKind,
    config: &SimulationConfig,
    args: &SimArgs,
) -> Result<SimulationReport> {
    let seeds = args.seed_range();
    tracing::info!(
        policy = %policy_name(kind, config),
        seeds = args.seeds,
        first_seed = args.first_seed,
        "simulating"
    );

    let report = match kind {
        PolicyKind::LargestFirst => {
            simulate_many(config.clone(), seeds, || {
                InputPolicy::<_, Sorted>::new(LargestFirst)
            })
            .await
        }
        PolicyKind::RandomImprove => {
            let max_inputs = config.max_inputs;
            simulate_many(config.clone(), seeds, move || {
                InputPolicy::<_, Sorted>::new(Fallback::new(
                    RandomImprove::new(max_inputs),
                    LargestFirst,
                ))
            })
            .await
        }
    };

    report.with_context(|| format!("simulation of {} failed", policy_name(kind, config)))
}

async fn run(args: cli::RunArgs) -> Result<()> {
    let config = init(&args.sim)?;
    let name = policy_name(args.policy, &config);
    let report = simulate_policy(args.policy, &config, &args.sim).await?;

    if args.json {
        let json = JsonReport {
            policy: &name,
            seeds: args.sim.seed_range(),
            config: &config,
            report: &report,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("failed to encode report")?
        );
    } else {
        print!("{}", render::render_report(&name, &report));
    }

    if args.metrics {
        let metrics = SimMetrics::new().context("failed to create metrics registry")?;
        metrics.record(&report);
        print!("{}", metrics.encode().context("failed to encode metrics")?);
    }

    Ok(())
}

async fn compare(args: SimArgs) -> Result<()> {
    let config = init(&args)?;

    let mut rows = Vec::with_capacity(PolicyKind::ALL.len());
    for kind in PolicyKind::ALL {
        let report = simulate_policy(kind, &config, &args).await?;
        rows.push((policy_name(kind, &config), report));
    }

    print!("{}", render::render_comparison(&rows));
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("nova-selection-sim {}", env!("CARGO_PKG_VERSION"));
    println!("fee model          fixed ({})", nova_selection::config::FEE);
}
