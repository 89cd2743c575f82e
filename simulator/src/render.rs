//! Plain-text rendering of simulation reports.

use std::fmt::Write;

use nova_selection::simulation::SimulationReport;

/// Widest bar in the input-count histogram.
const BAR_WIDTH: u64 = 40;

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

/// Full report for one policy.
pub fn render_report(policy: &str, report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "policy              : {policy}");
    let _ = writeln!(out, "wallets             : {}", report.wallets);
    let _ = writeln!(
        out,
        "payments            : {} ({} ok, {} rejected, {} success)",
        report.payments(),
        report.transactions,
        report.hard_errors,
        report
            .success_rate()
            .map_or_else(|| "n/a".to_string(), |r| format!("{:.2}%", r * 100.0)),
    );
    let _ = writeln!(out, "deposits            : {}", report.deposits);
    let _ = writeln!(out, "mean inputs per tx  : {}", fmt_opt(report.mean_inputs(), 3));
    let _ = writeln!(
        out,
        "mean change ratio   : {}",
        fmt_opt(report.stats.mean_ratio(), 4)
    );
    let _ = writeln!(
        out,
        "final utxo / wallet : {}",
        fmt_opt(report.mean_final_utxo_size(), 1)
    );
    let _ = writeln!(out, "final balance       : {}", report.final_balance);

    let histogram = &report.stats.input_counts;
    if !histogram.is_empty() {
        let peak = histogram.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);
        let _ = writeln!(out, "inputs per transaction:");
        for (inputs, count) in histogram.iter() {
            let bar = "#".repeat((count * BAR_WIDTH / peak) as usize);
            let _ = writeln!(out, "  {inputs:>4} | {count:>8} {bar}");
        }
    }
    out
}

/// One line per policy, for `compare`.
pub fn render_comparison(rows: &[(String, SimulationReport)]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<32} {:>8} {:>8} {:>10} {:>10} {:>12}",
        "policy", "txs", "errors", "inputs/tx", "change", "utxo/wallet"
    );
    for (name, report) in rows {
        let _ = writeln!(
            out,
            "{:<32} {:>8} {:>8} {:>10} {:>10} {:>12}",
            name,
            report.transactions,
            report.hard_errors,
            fmt_opt(report.mean_inputs(), 3),
            fmt_opt(report.stats.mean_ratio(), 4),
            fmt_opt(report.mean_final_utxo_size(), 1),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_selection::stats::{Monoid, PartialTxStats, TxStats};

    fn report() -> SimulationReport {
        SimulationReport {
            wallets: 2,
            transactions: 3,
            hard_errors: 1,
            deposits: 6,
            final_utxo_size: 10,
            final_balance: 5_000,
            stats: TxStats::concat([
                PartialTxStats::for_payment(1, 5, 10).finalize(),
                PartialTxStats::for_payment(1, 5, 10).finalize(),
                PartialTxStats::for_payment(3, 10, 10).finalize(),
            ]),
        }
    }

    #[test]
    fn report_lists_histogram_bins() {
        let text = render_report("largest-first", &report());
        assert!(text.contains("policy              : largest-first"));
        assert!(text.contains("75.00%"));
        assert!(text.contains(&format!("     1 |        2 {}", "#".repeat(40))));
        assert!(text.contains(&format!("     3 |        1 {}", "#".repeat(20))));
    }

    #[test]
    fn empty_report_renders_without_bins() {
        let text = render_report("x", &SimulationReport::default());
        assert!(text.contains("n/a"));
        assert!(!text.contains("inputs per transaction:"));
    }

    #[test]
    fn comparison_has_one_row_per_policy() {
        let rows = vec![("a".to_string(), report()), ("b".to_string(), report())];
        assert_eq!(render_comparison(&rows).lines().count(), 3);
    }
}
