//! # Environment Capabilities
//!
//! Things a policy needs but must not implement itself.
//!
//! ## Architecture
//!
//! ```text
//! chain.rs  — ChainContext (fresh change address, fresh hash), TxHash,
//!             CounterContext
//! random.rs — RandomSource (run_random, coin_toss), Probability,
//!             SeededRandom
//! ```
//!
//! [`SimEnvironment`] bundles both capabilities for simulations and tests.
//! Production wallets plug in their own key-derivation backed context.

pub mod chain;
pub mod random;

pub use chain::{encode_address, ChainContext, CounterContext, TxHash};
pub use random::{Probability, ProbabilityError, RandomSource, SeededRandom};

use rand::rngs::StdRng;

/// Counter-backed identifiers plus seeded randomness.
#[derive(Debug, Clone)]
pub struct SimEnvironment {
    chain: CounterContext,
    random: SeededRandom,
}

impl SimEnvironment {
    /// A fully deterministic environment for `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            chain: CounterContext::new(),
            random: SeededRandom::from_seed(seed),
        }
    }

    /// Identifier counters, for inspection.
    pub fn chain(&self) -> &CounterContext {
        &self.chain
    }
}

impl ChainContext for SimEnvironment {
    type Address = String;
    type Hash = TxHash;

    fn fresh_change_address(&mut self) -> String {
        self.chain.fresh_change_address()
    }

    fn fresh_hash(&mut self) -> TxHash {
        self.chain.fresh_hash()
    }
}

impl RandomSource for SimEnvironment {
    type Rng = StdRng;

    fn rng(&mut self) -> &mut StdRng {
        self.random.rng()
    }
}
