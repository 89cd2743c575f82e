// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Input Selection — Policy Engine
//!
//! Given a pool of unspent outputs and a list of payments, something has to
//! decide which outputs get spent. This crate is that something: a framework
//! for UTxO input-selection policies, plus the statistics machinery we use to
//! decide which policy deserves to ship.
//!
//! ## Architecture
//!
//! - **utxo** — The canonical UTxO map and the [`UtxoRepr`](utxo::UtxoRepr)
//!   capability every policy-specific representation implements.
//! - **transaction** — The immutable transaction a successful run produces.
//! - **stats** — Mergeable per-transaction statistics (input-count histogram,
//!   change/payment ratio multiset). They form a monoid, so simulations can
//!   fold them in any order.
//! - **env** — Capabilities a policy consumes but does not implement: fresh
//!   change addresses, fresh transaction hashes, randomness.
//! - **policy** — Errors, the rollback-safe execution context, the outward
//!   policy contract, and the reference heuristics.
//! - **simulation** — Drives a policy over many randomized transactions and
//!   aggregates the results, one independent run per seed.
//! - **config** — Engine constants and simulation defaults.
//!
//! ## Failure Model
//!
//! 1. A [`HardError`](policy::HardError) means the request cannot be met with
//!    the UTxO at hand. It always reaches the caller.
//! 2. A [`SoftError`](policy::SoftError) means one strategy gave up. It is
//!    caught inside the engine and another strategy runs from the same
//!    starting state. The outward contract cannot even express it.

pub mod config;
pub mod env;
pub mod policy;
pub mod simulation;
pub mod stats;
pub mod transaction;
pub mod utxo;

pub use policy::{
    HardError, InputPolicy, SelectionError, SelectionOutcome, SelectionPolicy, SoftError,
};
pub use stats::{PartialTxStats, TxStats};
pub use transaction::Transaction;
pub use utxo::{Input, Output, Utxo, UtxoRepr, Value};
