//! # Simulation Module
//!
//! Runs a policy against a randomly evolving wallet and aggregates what
//! happened, so competing policies can be compared on the same workload.
//!
//! ## Architecture
//!
//! ```text
//! scenario.rs — random wallets, payment requests and payee addresses
//! runner.rs   — simulate (one wallet, sequential) and simulate_many
//!               (one wallet per seed, tokio blocking pool)
//! report.rs   — SimulationReport, a monoid over wallets
//! ```
//!
//! Wallets share nothing. The only synchronization is the final fold of
//! their reports, and since reports form a monoid the fold order does not
//! matter.

pub mod report;
pub mod runner;
pub mod scenario;

pub use report::SimulationReport;
pub use runner::{simulate, simulate_many, SimulationError};
pub use scenario::{arbitrary_payments, arbitrary_utxo, random_address};
