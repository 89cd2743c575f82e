//! Fixed-width histograms.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use super::Monoid;
use crate::config::HISTOGRAM_BIN_WIDTH;

/// Occurrence counts keyed by bin.
///
/// A bin key is the lower bound of the bin: with width `w`, observation `x`
/// lands in bin `x - x % w`. Merging adds counts bin by bin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    bins: BTreeMap<u64, u64>,
}

impl Histogram {
    /// An empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// A histogram holding exactly one observation of `value`.
    pub fn singleton(value: u64) -> Self {
        let mut histogram = Self::new();
        histogram.observe(value);
        histogram
    }

    /// The bin `value` falls in.
    pub fn bin_of(value: u64) -> u64 {
        value - value % HISTOGRAM_BIN_WIDTH
    }

    /// Records one observation.
    pub fn observe(&mut self, value: u64) {
        self.observe_n(value, 1);
    }

    /// Records `count` observations of the same value.
    pub fn observe_n(&mut self, value: u64, count: u64) {
        if count == 0 {
            return;
        }
        *self.bins.entry(Self::bin_of(value)).or_insert(0) += count;
    }

    /// Observations in the bin containing `value`.
    pub fn count(&self, value: u64) -> u64 {
        self.bins.get(&Self::bin_of(value)).copied().unwrap_or(0)
    }

    /// Total number of observations.
    pub fn total(&self) -> u64 {
        self.bins.values().sum()
    }

    /// Number of non-empty bins.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Returns `true` if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Mean of the bin keys, weighted by count. `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted: f64 = self
            .bins
            .iter()
            .map(|(bin, count)| *bin as f64 * *count as f64)
            .sum();
        Some(weighted / total as f64)
    }

    /// Iterates `(bin, count)` pairs in ascending bin order.
    pub fn iter(&self) -> btree_map::Iter<'_, u64, u64> {
        self.bins.iter()
    }
}

impl Monoid for Histogram {
    fn identity() -> Self {
        Self::new()
    }

    fn merge(mut self, other: Self) -> Self {
        for (bin, count) in other.bins {
            *self.bins.entry(bin).or_insert(0) += count;
        }
        self
    }
}
