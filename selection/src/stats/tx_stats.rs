//! Per-transaction and accumulated selection statistics.

use serde::{Deserialize, Serialize};

use super::{Histogram, Monoid, MultiSet, Ratio};

// ---------------------------------------------------------------------------
// TxStats
// ---------------------------------------------------------------------------

/// Statistics over one or more finished transactions.
///
/// `input_counts` holds one observation per transaction (how many inputs it
/// spent); `ratios` holds one change/payment ratio per payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxStats {
    /// Inputs spent per transaction.
    pub input_counts: Histogram,
    /// Change/payment ratio of every payment.
    pub ratios: MultiSet<Ratio>,
}

impl TxStats {
    /// Number of transactions these statistics cover.
    pub fn transactions(&self) -> u64 {
        self.input_counts.total()
    }

    /// Average change/payment ratio. `None` when no payment was recorded.
    pub fn mean_ratio(&self) -> Option<f64> {
        let count = self.ratios.len();
        if count == 0 {
            return None;
        }
        let sum: f64 = self
            .ratios
            .iter()
            .map(|(ratio, n)| ratio.as_f64() * *n as f64)
            .sum();
        Some(sum / count as f64)
    }
}

impl Monoid for TxStats {
    fn identity() -> Self {
        Self::default()
    }

    fn merge(self, other: Self) -> Self {
        Self {
            input_counts: self.input_counts.merge(other.input_counts),
            ratios: self.ratios.merge(other.ratios),
        }
    }
}

// ---------------------------------------------------------------------------
// PartialTxStats
// ---------------------------------------------------------------------------

/// Statistics of a transaction still being built.
///
/// The input count is a raw integer here; it only becomes a histogram
/// observation when the transaction is finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialTxStats {
    /// Inputs selected so far.
    pub input_count: u64,
    /// Change/payment ratios recorded so far.
    pub ratios: MultiSet<Ratio>,
}

impl PartialTxStats {
    /// Statistics for one payment covered by `inputs` inputs leaving
    /// `change` behind. A zero payment contributes no ratio.
    pub fn for_payment(inputs: u64, change: u64, payment: u64) -> Self {
        let mut ratios = MultiSet::new();
        if let Some(ratio) = Ratio::new(change, payment) {
            ratios.insert(ratio);
        }
        Self {
            input_count: inputs,
            ratios,
        }
    }

    /// Closes the transaction: the input count becomes exactly one
    /// histogram observation; the ratios carry over unchanged.
    pub fn finalize(self) -> TxStats {
        TxStats {
            input_counts: Histogram::singleton(self.input_count),
            ratios: self.ratios,
        }
    }
}

impl Monoid for PartialTxStats {
    fn identity() -> Self {
        Self::default()
    }

    fn merge(self, other: Self) -> Self {
        Self {
            input_count: self.input_count + other.input_count,
            ratios: self.ratios.merge(other.ratios),
        }
    }
}
