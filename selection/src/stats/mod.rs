//! # Statistics Module
//!
//! Mergeable aggregates used to compare selection policies over many
//! simulated transactions.
//!
//! ## Architecture
//!
//! ```text
//! histogram.rs — Fixed-width histogram, merged bin by bin
//! multiset.rs  — Counted multiset, merged by adding multiplicities
//! ratio.rs     — Exact change/payment ratio (reduced fraction)
//! tx_stats.rs  — TxStats (finished) and PartialTxStats (in progress)
//! ```
//!
//! Every aggregate here is a [`Monoid`]: merging is associative and
//! commutative with an empty identity, so results from independent runs can
//! be folded in whatever order they arrive.

pub mod histogram;
pub mod multiset;
pub mod ratio;
pub mod tx_stats;

pub use histogram::Histogram;
pub use multiset::MultiSet;
pub use ratio::Ratio;
pub use tx_stats::{PartialTxStats, TxStats};

/// An associative merge with an identity.
///
/// Implementations must satisfy, for all `a`, `b`, `c`:
///
/// - `a.merge(identity()) == a`
/// - `a.merge(b.merge(c)) == a.merge(b).merge(c)`
///
/// Everything in this module is also commutative.
pub trait Monoid: Sized {
    /// The neutral element.
    fn identity() -> Self;

    /// Combines two values.
    fn merge(self, other: Self) -> Self;

    /// Folds any number of values, starting from the identity.
    fn concat<I: IntoIterator<Item = Self>>(items: I) -> Self {
        items.into_iter().fold(Self::identity(), Self::merge)
    }
}
