//! # Prometheus Metrics
//!
//! Simulation results in Prometheus form, printed in the text exposition
//! format with `--metrics` so runs can be pushed to a gateway or diffed.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder,
};

use nova_selection::simulation::SimulationReport;

/// Holds all Prometheus metric handles for one simulator invocation.
#[derive(Clone)]
pub struct SimMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Payments that produced a transaction.
    pub transactions_total: IntCounter,
    /// Payments rejected with a hard error.
    pub hard_errors_total: IntCounter,
    /// Deposit steps.
    pub deposits_total: IntCounter,
    /// Entries left across all wallets at the end of the run.
    pub final_utxo_size: IntGauge,
    /// Inputs spent per transaction.
    pub inputs_per_transaction: Histogram,
    /// Change/payment ratio per payment.
    pub change_ratio: Histogram,
}

impl SimMetrics {
    /// Creates and registers all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("nova_sim".into()), None)?;

        let transactions_total = IntCounter::new(
            "transactions_total",
            "Simulated payments that produced a transaction",
        )?;
        registry.register(Box::new(transactions_total.clone()))?;

        let hard_errors_total = IntCounter::new(
            "hard_errors_total",
            "Simulated payments rejected with a hard error",
        )?;
        registry.register(Box::new(hard_errors_total.clone()))?;

        let deposits_total = IntCounter::new("deposits_total", "Simulated deposit steps")?;
        registry.register(Box::new(deposits_total.clone()))?;

        let final_utxo_size = IntGauge::new(
            "final_utxo_size",
            "UTxO entries left across all wallets at the end of the run",
        )?;
        registry.register(Box::new(final_utxo_size.clone()))?;

        let inputs_per_transaction = Histogram::with_opts(
            HistogramOpts::new("inputs_per_transaction", "Inputs spent per transaction")
                .buckets(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 15.0, 20.0, 50.0]),
        )?;
        registry.register(Box::new(inputs_per_transaction.clone()))?;

        let change_ratio = Histogram::with_opts(
            HistogramOpts::new("change_ratio", "Change value over payment value, per payment")
                .buckets(vec![0.0, 0.1, 0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 5.0, 10.0]),
        )?;
        registry.register(Box::new(change_ratio.clone()))?;

        Ok(Self {
            registry,
            transactions_total,
            hard_errors_total,
            deposits_total,
            final_utxo_size,
            inputs_per_transaction,
            change_ratio,
        })
    }

    /// Folds a finished report into the metrics.
    pub fn record(&self, report: &SimulationReport) {
        self.transactions_total.inc_by(report.transactions);
        self.hard_errors_total.inc_by(report.hard_errors);
        self.deposits_total.inc_by(report.deposits);
        self.final_utxo_size
            .set(i64::try_from(report.final_utxo_size).unwrap_or(i64::MAX));

        for (inputs, count) in report.stats.input_counts.iter() {
            for _ in 0..*count {
                self.inputs_per_transaction.observe(*inputs as f64);
            }
        }
        for (ratio, count) in report.stats.ratios.iter() {
            for _ in 0..*count {
                self.change_ratio.observe(ratio.as_f64());
            }
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
