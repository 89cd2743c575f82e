//! # UTxO Module
//!
//! The unspent output set in all its shapes.
//!
//! ## Architecture
//!
//! ```text
//! types.rs     — Value, Input (tx hash + index), Output (address + value)
//! canonical.rs — Utxo: the canonical, interchange form
//! repr.rs      — UtxoRepr: the capability every representation implements
//! sorted.rs    — SortedUtxo: value-ordered index with a running balance
//! ```
//!
//! ## Ownership
//!
//! A UTxO value is owned by whoever currently holds it. The execution
//! context owns the remaining UTxO of a run and nothing else aliases it;
//! representation changes go through [`convert`], never through shared
//! mutable state.

pub mod canonical;
pub mod repr;
pub mod sorted;
pub mod types;

pub use canonical::Utxo;
pub use repr::{convert, UtxoRepr};
pub use sorted::SortedUtxo;
pub use types::{total_value, Input, Output, Value};
