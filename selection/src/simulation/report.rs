//! Aggregated simulation results.

use serde::{Deserialize, Serialize};

use crate::stats::{Monoid, TxStats};
use crate::utxo::Value;

/// What one or more simulated wallets went through.
///
/// Counts and final wallet figures add up across wallets; statistics merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Wallets simulated.
    pub wallets: u64,
    /// Payments that produced a transaction.
    pub transactions: u64,
    /// Payments the policy rejected.
    pub hard_errors: u64,
    /// Deposit steps.
    pub deposits: u64,
    /// Entries left in the wallets at the end.
    pub final_utxo_size: u64,
    /// Value left in the wallets at the end.
    pub final_balance: Value,
    /// Statistics of every transaction built.
    pub stats: TxStats,
}

impl SimulationReport {
    /// Payment attempts, successful or not.
    pub fn payments(&self) -> u64 {
        self.transactions + self.hard_errors
    }

    /// Share of payment attempts that produced a transaction.
    pub fn success_rate(&self) -> Option<f64> {
        match self.payments() {
            0 => None,
            n => Some(self.transactions as f64 / n as f64),
        }
    }

    /// Average inputs per transaction.
    pub fn mean_inputs(&self) -> Option<f64> {
        self.stats.input_counts.mean()
    }

    /// Average final wallet size.
    pub fn mean_final_utxo_size(&self) -> Option<f64> {
        match self.wallets {
            0 => None,
            n => Some(self.final_utxo_size as f64 / n as f64),
        }
    }
}

impl Monoid for SimulationReport {
    fn identity() -> Self {
        Self::default()
    }

    fn merge(self, other: Self) -> Self {
        Self {
            wallets: self.wallets + other.wallets,
            transactions: self.transactions + other.transactions,
            hard_errors: self.hard_errors + other.hard_errors,
            deposits: self.deposits + other.deposits,
            final_utxo_size: self.final_utxo_size + other.final_utxo_size,
            final_balance: self.final_balance.saturating_add(other.final_balance),
            stats: self.stats.merge(other.stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::PartialTxStats;

    fn report(transactions: u64, hard_errors: u64, inputs: u64) -> SimulationReport {
        SimulationReport {
            wallets: 1,
            transactions,
            hard_errors,
            deposits: 3,
            final_utxo_size: 10,
            final_balance: 1_000,
            stats: PartialTxStats::for_payment(inputs, 1, 2).finalize(),
        }
    }

    #[test]
    fn merge_adds_everything() {
        let merged = report(4, 1, 2).merge(report(6, 3, 5));
        assert_eq!(merged.wallets, 2);
        assert_eq!(merged.payments(), 14);
        assert_eq!(merged.final_balance, 2_000);
        assert_eq!(merged.stats.transactions(), 2);
        assert_eq!(merged.mean_final_utxo_size(), Some(10.0));
    }

    #[test]
    fn identity_is_neutral() {
        let r = report(4, 1, 2);
        assert_eq!(r.clone().merge(SimulationReport::identity()), r);
    }

    #[test]
    fn success_rate_needs_payments() {
        assert_eq!(SimulationReport::default().success_rate(), None);
        assert_eq!(report(3, 1, 1).success_rate(), Some(0.75));
    }
}
