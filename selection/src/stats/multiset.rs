//! Counted multisets.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Monoid;

/// A multiset: each distinct element with its multiplicity.
///
/// Union adds multiplicities element by element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSet<T: Ord> {
    counts: BTreeMap<T, u64>,
}

impl<T: Ord> MultiSet<T> {
    /// An empty multiset.
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Adds one occurrence of `item`.
    pub fn insert(&mut self, item: T) {
        self.insert_n(item, 1);
    }

    /// Adds `count` occurrences of `item`.
    pub fn insert_n(&mut self, item: T, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(item).or_insert(0) += count;
    }

    /// Multiplicity of `item`.
    pub fn count(&self, item: &T) -> u64 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Total number of occurrences, counting duplicates.
    pub fn len(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct elements.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if the multiset has no elements.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(element, multiplicity)` in ascending element order.
    pub fn iter(&self) -> btree_map::Iter<'_, T, u64> {
        self.counts.iter()
    }
}

impl<T: Ord> Default for MultiSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Monoid for MultiSet<T> {
    fn identity() -> Self {
        Self::new()
    }

    fn merge(mut self, other: Self) -> Self {
        for (item, count) in other.counts {
            self.insert_n(item, count);
        }
        self
    }
}

impl<T: Ord> FromIterator<T> for MultiSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

// Elements may be structs, so serialize as `[element, count]` pairs instead
// of a map.
impl<T: Ord + Serialize> Serialize for MultiSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.counts.iter())
    }
}

impl<'de, T: Ord + Deserialize<'de>> Deserialize<'de> for MultiSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs: Vec<(T, u64)> = Vec::deserialize(deserializer)?;
        let mut set = Self::new();
        for (item, count) in pairs {
            set.insert_n(item, count);
        }
        Ok(set)
    }
}
