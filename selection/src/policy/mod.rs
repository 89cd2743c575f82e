//! # Policy Module
//!
//! Everything between "here is a UTxO and some payments" and "here is a
//! transaction".
//!
//! ## Architecture
//!
//! ```text
//! error.rs          — HardError, SoftError, SelectionError
//! state.rs          — SelectionState: remaining / committed / generated
//! context.rs        — SelectionContext (attempt, catch_soft, map_error,
//!                     select, emit, settle) and run_policy
//! strategy.rs       — SelectionStrategy (inward) and Fallback
//! contract.rs       — SelectionPolicy (outward), InputPolicy, SelectionOutcome
//! largest_first.rs  — LargestFirst over SortedUtxo
//! random_improve.rs — RandomImprove over any representation
//! ```
//!
//! ## Layering
//!
//! Strategies run inside a [`SelectionContext`] and may fail softly.
//! [`Fallback`] catches soft failures by running a second strategy from the
//! same starting state. [`InputPolicy`] turns a strategy that can only fail
//! hard into a [`SelectionPolicy`], which is what callers use.

pub mod context;
pub mod contract;
pub mod error;
pub mod largest_first;
pub mod random_improve;
pub mod state;
pub mod strategy;

pub use context::{run_policy, SelectionContext};
pub use contract::{validate_request, InputPolicy, SelectionOutcome, SelectionPolicy};
pub use error::{HardError, SelectionError, SoftError};
pub use largest_first::LargestFirst;
pub use random_improve::RandomImprove;
pub use state::SelectionState;
pub use strategy::{Fallback, SelectionStrategy};
