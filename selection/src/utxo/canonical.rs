//! The canonical UTxO map.
//!
//! [`Utxo`] is the interchange form: storage hands the engine one of these,
//! successful runs report consumed entries as one of these, and every
//! policy-specific representation converts through it. It is a plain
//! `BTreeMap` so iteration order is deterministic, which keeps simulations
//! reproducible for a given seed.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::types::{Input, Output, Value};

/// Mapping from input reference to the output it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo<H, A> {
    entries: BTreeMap<Input<H>, Output<A>>,
}

impl<H: Ord, A> Utxo<H, A> {
    /// Creates an empty UTxO.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts an entry, returning the output previously stored under the
    /// same input, if any.
    pub fn insert(&mut self, input: Input<H>, output: Output<A>) -> Option<Output<A>> {
        self.entries.insert(input, output)
    }

    /// Removes a single entry.
    pub fn remove(&mut self, input: &Input<H>) -> Option<Output<A>> {
        self.entries.remove(input)
    }

    /// Looks up the output behind an input.
    pub fn get(&self, input: &Input<H>) -> Option<&Output<A>> {
        self.entries.get(input)
    }

    /// Returns `true` if `input` is in the domain.
    pub fn contains(&self, input: &Input<H>) -> bool {
        self.entries.contains_key(input)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all output values.
    ///
    /// Saturates at `Value::MAX`; a real UTxO is bounded by total supply and
    /// never gets there.
    pub fn balance(&self) -> Value {
        self.entries
            .values()
            .fold(0, |acc: Value, out| acc.saturating_add(out.value()))
    }

    /// Output values in input order.
    pub fn output_values(&self) -> Vec<Value> {
        self.entries.values().map(Output::value).collect()
    }

    /// Iterates entries in input order.
    pub fn iter(&self) -> btree_map::Iter<'_, Input<H>, Output<A>> {
        self.entries.iter()
    }

    /// Iterates the domain in order.
    pub fn inputs(&self) -> btree_map::Keys<'_, Input<H>, Output<A>> {
        self.entries.keys()
    }

    /// Moves every entry of `other` into `self`. On a shared input, the
    /// entry from `other` wins.
    pub fn union(&mut self, other: Utxo<H, A>) {
        self.entries.extend(other.entries);
    }

    /// Domain subtraction: drops every input that appears in `other`.
    pub fn remove_inputs(&mut self, other: &Utxo<H, A>) {
        for input in other.inputs() {
            self.entries.remove(input);
        }
    }

    /// Returns `true` if every entry of `self` appears, identically, in
    /// `other`.
    pub fn is_submap_of(&self, other: &Utxo<H, A>) -> bool
    where
        A: PartialEq,
    {
        self.entries
            .iter()
            .all(|(input, output)| other.get(input) == Some(output))
    }
}

impl<H: Ord, A> Default for Utxo<H, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Ord, A> FromIterator<(Input<H>, Output<A>)> for Utxo<H, A> {
    fn from_iter<I: IntoIterator<Item = (Input<H>, Output<A>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<H: Ord, A> Extend<(Input<H>, Output<A>)> for Utxo<H, A> {
    fn extend<I: IntoIterator<Item = (Input<H>, Output<A>)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<H, A> IntoIterator for Utxo<H, A> {
    type Item = (Input<H>, Output<A>);
    type IntoIter = btree_map::IntoIter<Input<H>, Output<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, H, A> IntoIterator for &'a Utxo<H, A> {
    type Item = (&'a Input<H>, &'a Output<A>);
    type IntoIter = btree_map::Iter<'a, Input<H>, Output<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

// Inputs are structs, and most formats (JSON among them) only accept string
// map keys. The canonical form is therefore serialized as a list of entries.

#[derive(Serialize)]
struct EntryRef<'a, H, A> {
    input: &'a Input<H>,
    output: &'a Output<A>,
}

#[derive(Deserialize)]
struct Entry<H, A> {
    input: Input<H>,
    output: Output<A>,
}

impl<H: Serialize, A: Serialize> Serialize for Utxo<H, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.entries
                .iter()
                .map(|(input, output)| EntryRef { input, output }),
        )
    }
}

impl<'de, H, A> Deserialize<'de> for Utxo<H, A>
where
    H: Deserialize<'de> + Ord,
    A: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries: Vec<Entry<H, A>> = Vec::deserialize(deserializer)?;
        let len = entries.len();
        let utxo: Utxo<H, A> = entries
            .into_iter()
            .map(|entry| (entry.input, entry.output))
            .collect();
        if utxo.len() != len {
            return Err(serde::de::Error::custom("duplicate input in UTxO"));
        }
        Ok(utxo)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
