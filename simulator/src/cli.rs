//! # CLI Interface
//!
//! Defines the command-line argument structure for `nova-selection-sim`
//! using `clap` derive. Supports three subcommands: `run`, `compare`, and
//! `version`.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::logging::LogFormat;

use nova_selection::config::{
    SimulationConfig, DEFAULT_DEPOSIT_PROBABILITY, DEFAULT_INITIAL_UTXO_SIZE, DEFAULT_MAX_DEPOSIT,
    DEFAULT_MAX_INPUTS, DEFAULT_MAX_PAYMENT, DEFAULT_MIN_DEPOSIT, DEFAULT_MIN_PAYMENT,
    DEFAULT_PAYMENTS_PER_TX, DEFAULT_SEED_COUNT, DEFAULT_SIMULATION_STEPS,
};

/// NOVA input-selection simulator.
///
/// Evolves simulated wallets under a selection policy and reports how many
/// inputs each transaction spent and how large the change came out.
#[derive(Parser, Debug)]
#[command(
    name = "nova-selection-sim",
    about = "NOVA input-selection policy simulator",
    version,
    propagate_version = true
)]
pub struct NovaSimCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simulate one policy.
    Run(RunArgs),
    /// Simulate every policy on the same seeds and print them side by side.
    Compare(SimArgs),
    /// Print version information and exit.
    Version,
}

/// Selection policies the simulator knows.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Largest entries first, all payments at once.
    LargestFirst,
    /// Random-improve per payment, falling back to largest-first.
    RandomImprove,
}

impl PolicyKind {
    /// Every policy, in `compare` order.
    pub const ALL: [PolicyKind; 2] = [PolicyKind::LargestFirst, PolicyKind::RandomImprove];
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Policy to simulate.
    #[arg(long, short = 'p', env = "NOVA_SIM_POLICY", value_enum, default_value_t = PolicyKind::RandomImprove)]
    pub policy: PolicyKind,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Print Prometheus metrics after the report.
    #[arg(long)]
    pub metrics: bool,

    #[command(flatten)]
    pub sim: SimArgs,
}

/// Workload and logging options shared by `run` and `compare`.
#[derive(Args, Debug, Clone)]
pub struct SimArgs {
    /// Number of independent wallets (one per seed).
    #[arg(long, env = "NOVA_SIM_SEEDS", default_value_t = DEFAULT_SEED_COUNT)]
    pub seeds: u64,

    /// First seed; wallets use `first_seed..first_seed + seeds`.
    #[arg(long, env = "NOVA_SIM_FIRST_SEED", default_value_t = 0)]
    pub first_seed: u64,

    /// Steps (deposits + payments) per wallet.
    #[arg(long, env = "NOVA_SIM_STEPS", default_value_t = DEFAULT_SIMULATION_STEPS)]
    pub steps: usize,

    /// Probability that a step is a deposit.
    #[arg(long, env = "NOVA_SIM_DEPOSIT_PROBABILITY", default_value_t = DEFAULT_DEPOSIT_PROBABILITY)]
    pub deposit_probability: f64,

    /// Entries each wallet starts with.
    #[arg(long, env = "NOVA_SIM_INITIAL_UTXO_SIZE", default_value_t = DEFAULT_INITIAL_UTXO_SIZE)]
    pub initial_utxo_size: usize,

    /// Smallest deposit value.
    #[arg(long, env = "NOVA_SIM_MIN_DEPOSIT", default_value_t = DEFAULT_MIN_DEPOSIT)]
    pub min_deposit: u64,

    /// Largest deposit value.
    #[arg(long, env = "NOVA_SIM_MAX_DEPOSIT", default_value_t = DEFAULT_MAX_DEPOSIT)]
    pub max_deposit: u64,

    /// Smallest payment value.
    #[arg(long, env = "NOVA_SIM_MIN_PAYMENT", default_value_t = DEFAULT_MIN_PAYMENT)]
    pub min_payment: u64,

    /// Largest payment value.
    #[arg(long, env = "NOVA_SIM_MAX_PAYMENT", default_value_t = DEFAULT_MAX_PAYMENT)]
    pub max_payment: u64,

    /// Payments bundled into one transaction.
    #[arg(long, env = "NOVA_SIM_PAYMENTS_PER_TX", default_value_t = DEFAULT_PAYMENTS_PER_TX)]
    pub payments_per_tx: usize,

    /// Input cap per payment for random-improve.
    #[arg(long, env = "NOVA_SIM_MAX_INPUTS", default_value_t = DEFAULT_MAX_INPUTS)]
    pub max_inputs: usize,

    /// Log output format.
    #[arg(long, env = "NOVA_SIM_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, env = "NOVA_SIM_LOG_LEVEL", default_value = "nova_selection_sim=info,nova_selection=warn")]
    pub log_level: String,
}

impl SimArgs {
    /// The simulation config these flags describe.
    pub fn to_config(&self) -> SimulationConfig {
        SimulationConfig {
            steps: self.steps,
            deposit_probability: self.deposit_probability,
            initial_utxo_size: self.initial_utxo_size,
            min_deposit: self.min_deposit,
            max_deposit: self.max_deposit,
            min_payment: self.min_payment,
            max_payment: self.max_payment,
            payments_per_tx: self.payments_per_tx,
            max_inputs: self.max_inputs,
        }
    }

    /// Seeds of the simulated wallets.
    pub fn seed_range(&self) -> std::ops::Range<u64> {
        self.first_seed..self.first_seed.saturating_add(self.seeds)
    }
}
