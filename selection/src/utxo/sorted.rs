//! A value-ordered UTxO representation.
//!
//! [`SortedUtxo`] keeps a secondary index ordered by `(value, input)` next to
//! the input-keyed map, plus a running balance. Largest-first selection reads
//! the top of the index in `O(log n)`, and balance queries never rescan.

use std::collections::{BTreeMap, BTreeSet};

use super::canonical::Utxo;
use super::repr::UtxoRepr;
use super::types::{Input, Output, Value};

/// UTxO kept sorted by output value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedUtxo<H, A> {
    entries: BTreeMap<Input<H>, Output<A>>,
    by_value: BTreeSet<(Value, Input<H>)>,
    balance: Value,
}

impl<H, A> SortedUtxo<H, A>
where
    H: Ord + Clone,
    A: Clone,
{
    /// The entry with the largest value. Ties go to the largest input.
    pub fn largest(&self) -> Option<(&Input<H>, &Output<A>)> {
        let (_, input) = self.by_value.last()?;
        self.entries.get_key_value(input)
    }

    /// The entry with the smallest value. Ties go to the smallest input.
    pub fn smallest(&self) -> Option<(&Input<H>, &Output<A>)> {
        let (_, input) = self.by_value.first()?;
        self.entries.get_key_value(input)
    }

    /// Iterates entries from the largest value down.
    pub fn iter_descending(&self) -> impl Iterator<Item = (&Input<H>, &Output<A>)> + '_ {
        self.by_value
            .iter()
            .rev()
            .filter_map(|(_, input)| self.entries.get_key_value(input))
    }

    /// Looks up the output behind an input.
    pub fn get(&self, input: &Input<H>) -> Option<&Output<A>> {
        self.entries.get(input)
    }

    fn insert(&mut self, input: Input<H>, output: Output<A>) {
        let value = output.value();
        if let Some(previous) = self.entries.insert(input.clone(), output) {
            self.by_value.remove(&(previous.value(), input.clone()));
            self.balance = self.balance.saturating_sub(previous.value());
        }
        self.by_value.insert((value, input));
        self.balance = self.balance.saturating_add(value);
    }

    fn remove(&mut self, input: &Input<H>) {
        if let Some(output) = self.entries.remove(input) {
            self.by_value.remove(&(output.value(), input.clone()));
            self.balance = self.balance.saturating_sub(output.value());
        }
    }
}

impl<H, A> UtxoRepr<H, A> for SortedUtxo<H, A>
where
    H: Ord + Clone,
    A: Clone,
{
    fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_value: BTreeSet::new(),
            balance: 0,
        }
    }

    fn union(&mut self, entries: Utxo<H, A>) {
        for (input, output) in entries {
            self.insert(input, output);
        }
    }

    fn size(&self) -> usize {
        self.entries.len()
    }

    fn balance(&self) -> Value {
        self.balance
    }

    fn output_values(&self) -> Vec<Value> {
        self.by_value.iter().map(|(value, _)| *value).collect()
    }

    fn lookup(&self, input: &Input<H>) -> Option<&Output<A>> {
        self.entries.get(input)
    }

    fn remove_inputs(&mut self, to_remove: &Utxo<H, A>) {
        for input in to_remove.inputs() {
            self.remove(input);
        }
    }

    fn to_canonical(&self) -> Utxo<H, A> {
        self.entries
            .iter()
            .map(|(input, output)| (input.clone(), output.clone()))
            .collect()
    }
}

impl<H, A> Default for SortedUtxo<H, A>
where
    H: Ord + Clone,
    A: Clone,
{
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(values: &[Value]) -> SortedUtxo<u32, &'static str> {
        let canonical: Utxo<u32, &'static str> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (Input::new(i as u32, 0), Output::new("owner", *v)))
            .collect();
        SortedUtxo::from_canonical(canonical)
    }

    #[test]
    fn output_values_are_ascending() {
        let utxo = sorted(&[30, 10, 20]);
        assert_eq!(utxo.output_values(), vec![10, 20, 30]);
    }

    #[test]
    fn largest_and_smallest() {
        let utxo = sorted(&[30, 10, 20]);
        assert_eq!(utxo.largest().map(|(_, o)| o.value()), Some(30));
        assert_eq!(utxo.smallest().map(|(_, o)| o.value()), Some(10));
        assert!(sorted(&[]).largest().is_none());
    }

    #[test]
    fn ties_break_on_input() {
        let utxo = sorted(&[5, 5, 5]);
        let (input, _) = utxo.largest().expect("non-empty");
        assert_eq!(input, &Input::new(2, 0));
    }

    #[test]
    fn running_balance_tracks_removals() {
        let mut utxo = sorted(&[10, 20, 30]);
        assert_eq!(utxo.balance(), 60);

        let mut spent = Utxo::new();
        spent.insert(Input::new(1, 0), Output::new("owner", 20));
        utxo.remove_inputs(&spent);

        assert_eq!(utxo.balance(), 40);
        assert_eq!(utxo.size(), 2);
        assert_eq!(utxo.output_values(), vec![10, 30]);
    }

    #[test]
    fn union_replacing_an_entry_keeps_index_consistent() {
        let mut utxo = sorted(&[10, 20]);
        let mut update = Utxo::new();
        update.insert(Input::new(0, 0), Output::new("owner", 50));
        utxo.union(update);

        assert_eq!(utxo.size(), 2);
        assert_eq!(utxo.balance(), 70);
        assert_eq!(utxo.output_values(), vec![20, 50]);
    }

    #[test]
    fn descending_iteration() {
        let utxo = sorted(&[3, 1, 2]);
        let values: Vec<Value> = utxo.iter_descending().map(|(_, o)| o.value()).collect();
        assert_eq!(values, vec![3, 2, 1]);
    }
}
