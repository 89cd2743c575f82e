//! The UTxO representation capability.
//!
//! Different heuristics want the UTxO laid out differently: largest-first
//! wants it sorted by value, random selection is happy with anything. Rather
//! than force one layout on everyone, each policy picks a representation that
//! implements [`UtxoRepr`], and all representations convert through the
//! canonical [`Utxo`].

use super::canonical::Utxo;
use super::types::{Input, Output, Value};

/// Operations every UTxO representation supports.
///
/// `Clone` is required because the execution context snapshots the remaining
/// UTxO before every transactional sub-computation.
///
/// # Laws
///
/// - `U::from_canonical(c).to_canonical() == c` for every canonical `c`.
/// - `balance()` equals `to_canonical().balance()`.
/// - `output_values().len() == size()`.
pub trait UtxoRepr<H, A>: Clone
where
    H: Ord + Clone,
    A: Clone,
{
    /// A representation with no entries.
    fn empty() -> Self;

    /// Merges canonical entries in. The representation decides the layout.
    fn union(&mut self, entries: Utxo<H, A>);

    /// Number of entries.
    fn size(&self) -> usize;

    /// Sum of all output values.
    fn balance(&self) -> Value;

    /// Every output value; one per entry, in representation order.
    fn output_values(&self) -> Vec<Value>;

    /// The output held under `input`, if any.
    fn lookup(&self, input: &Input<H>) -> Option<&Output<A>>;

    /// Domain subtraction. The caller passes the full entries being removed
    /// so representations that keep aggregates can adjust them directly.
    fn remove_inputs(&mut self, to_remove: &Utxo<H, A>);

    /// Exports to the canonical form.
    fn to_canonical(&self) -> Utxo<H, A>;

    /// Imports from the canonical form.
    fn from_canonical(entries: Utxo<H, A>) -> Self {
        let mut repr = Self::empty();
        repr.union(entries);
        repr
    }
}

/// Changes representation by a round trip through the canonical form.
///
/// This is the only sanctioned way to move between representations, which
/// is what makes the round-trip law sufficient for content preservation.
pub fn convert<H, A, U, V>(repr: &U) -> V
where
    H: Ord + Clone,
    A: Clone,
    U: UtxoRepr<H, A>,
    V: UtxoRepr<H, A>,
{
    V::from_canonical(repr.to_canonical())
}

// The canonical form is itself a representation.
impl<H, A> UtxoRepr<H, A> for Utxo<H, A>
where
    H: Ord + Clone,
    A: Clone,
{
    fn empty() -> Self {
        Utxo::new()
    }

    fn union(&mut self, entries: Utxo<H, A>) {
        Utxo::union(self, entries);
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn balance(&self) -> Value {
        Utxo::balance(self)
    }

    fn output_values(&self) -> Vec<Value> {
        Utxo::output_values(self)
    }

    fn lookup(&self, input: &Input<H>) -> Option<&Output<A>> {
        self.get(input)
    }

    fn remove_inputs(&mut self, to_remove: &Utxo<H, A>) {
        Utxo::remove_inputs(self, to_remove);
    }

    fn to_canonical(&self) -> Utxo<H, A> {
        self.clone()
    }

    fn from_canonical(entries: Utxo<H, A>) -> Self {
        entries
    }
}
