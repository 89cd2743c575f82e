//! # Engine Configuration & Constants
//!
//! Every number the selection engine depends on lives here, together with the
//! tunables of a simulation run. If a policy needs a constant that is not in
//! this file, it belongs in this file.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utxo::Value;

// ---------------------------------------------------------------------------
// Transaction Construction
// ---------------------------------------------------------------------------

/// Fee attached to every transaction the engine builds.
///
/// Fee calculation is an open extension point. Until a fee model lands, every
/// transaction pays zero and balance conservation is exact.
pub const FEE: Value = 0;

/// Width of one bin in the input-count histogram. One bin per input count.
pub const HISTOGRAM_BIN_WIDTH: u64 = 1;

/// Bech32 human-readable prefix for change addresses minted by
/// [`CounterContext`](crate::env::CounterContext).
pub const CHANGE_ADDRESS_HRP: &str = "dnova";

/// Domain separation tag mixed into every fresh transaction hash, so that
/// hashes minted here can never collide with hashes of real transaction bytes.
pub const TX_HASH_DOMAIN: &[u8] = b"NOVA-SELECTION-TXHASH-v1";

/// Domain separation tag for fresh change address payloads.
pub const CHANGE_ADDRESS_DOMAIN: &[u8] = b"NOVA-SELECTION-CHANGE-v1";

// ---------------------------------------------------------------------------
// Simulation Defaults
// ---------------------------------------------------------------------------

/// Steps (deposits + payments) per simulated wallet.
pub const DEFAULT_SIMULATION_STEPS: usize = 500;

/// Probability that a simulation step is a deposit rather than a payment.
pub const DEFAULT_DEPOSIT_PROBABILITY: f64 = 0.5;

/// Number of entries in the wallet before the first step.
pub const DEFAULT_INITIAL_UTXO_SIZE: usize = 20;

/// Smallest deposit, in photons.
pub const DEFAULT_MIN_DEPOSIT: Value = 1_000;

/// Largest deposit, in photons.
pub const DEFAULT_MAX_DEPOSIT: Value = 1_000_000;

/// Smallest payment, in photons.
pub const DEFAULT_MIN_PAYMENT: Value = 500;

/// Largest payment, in photons.
pub const DEFAULT_MAX_PAYMENT: Value = 400_000;

/// Payments bundled into one simulated transaction.
pub const DEFAULT_PAYMENTS_PER_TX: usize = 1;

/// Input cap per payment for bounded strategies such as random-improve.
pub const DEFAULT_MAX_INPUTS: usize = 10;

/// Number of independent wallets the simulator runs by default.
pub const DEFAULT_SEED_COUNT: u64 = 8;

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

/// Rejected simulation settings.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A value range whose lower bound exceeds its upper bound, or that
    /// starts at zero (zero-value entries are meaningless).
    #[error("invalid {name} range: {min}..={max}")]
    InvalidRange {
        /// Which range was rejected.
        name: &'static str,
        /// Lower bound as configured.
        min: Value,
        /// Upper bound as configured.
        max: Value,
    },

    /// Deposit probability outside `[0, 1]`.
    #[error("deposit probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    /// A count that must be at least one was zero.
    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),
}

/// Tunables for one simulated wallet.
///
/// Defaults come from the constants above and are tuned so that a default run
/// sees a healthy mix of successful payments and the occasional hard error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Deposits + payments performed per wallet.
    pub steps: usize,

    /// Probability that a step is a deposit.
    pub deposit_probability: f64,

    /// Entries the wallet starts with.
    pub initial_utxo_size: usize,

    /// Smallest deposit value.
    pub min_deposit: Value,

    /// Largest deposit value.
    pub max_deposit: Value,

    /// Smallest payment value.
    pub min_payment: Value,

    /// Largest payment value.
    pub max_payment: Value,

    /// Payments bundled into one transaction.
    pub payments_per_tx: usize,

    /// Input cap per payment for bounded strategies.
    pub max_inputs: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_SIMULATION_STEPS,
            deposit_probability: DEFAULT_DEPOSIT_PROBABILITY,
            initial_utxo_size: DEFAULT_INITIAL_UTXO_SIZE,
            min_deposit: DEFAULT_MIN_DEPOSIT,
            max_deposit: DEFAULT_MAX_DEPOSIT,
            min_payment: DEFAULT_MIN_PAYMENT,
            max_payment: DEFAULT_MAX_PAYMENT,
            payments_per_tx: DEFAULT_PAYMENTS_PER_TX,
            max_inputs: DEFAULT_MAX_INPUTS,
        }
    }
}

impl SimulationConfig {
    /// Checks that every range is non-empty and strictly positive, that the
    /// deposit probability is a probability, and that counts are non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("deposit", self.min_deposit, self.max_deposit)?;
        check_range("payment", self.min_payment, self.max_payment)?;

        if !(0.0..=1.0).contains(&self.deposit_probability) {
            return Err(ConfigError::InvalidProbability(self.deposit_probability));
        }
        if self.payments_per_tx == 0 {
            return Err(ConfigError::ZeroCount("payments_per_tx"));
        }
        if self.max_inputs == 0 {
            return Err(ConfigError::ZeroCount("max_inputs"));
        }
        Ok(())
    }

    /// Deposit values as an inclusive range.
    pub fn deposit_range(&self) -> RangeInclusive<Value> {
        self.min_deposit..=self.max_deposit
    }

    /// Payment values as an inclusive range.
    pub fn payment_range(&self) -> RangeInclusive<Value> {
        self.min_payment..=self.max_payment
    }
}

fn check_range(name: &'static str, min: Value, max: Value) -> Result<(), ConfigError> {
    if min == 0 || min > max {
        return Err(ConfigError::InvalidRange { name, min, max });
    }
    Ok(())
}
