//! Sequential wallet simulation and the parallel multi-seed driver.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info};

use super::report::SimulationReport;
use super::scenario::{arbitrary_payments, arbitrary_utxo};
use crate::config::{ConfigError, SimulationConfig};
use crate::env::{ChainContext, Probability, ProbabilityError, RandomSource, SimEnvironment};
use crate::policy::{SelectionOutcome, SelectionPolicy};
use crate::stats::Monoid;
use crate::utxo::{Input, Output, Utxo};

/// Why a simulation could not run. Rejected payments are not errors; they
/// are counted in the report.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulation config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Probability(#[from] ProbabilityError),

    #[error("simulation task failed: {0}")]
    Task(#[from] JoinError),
}

/// Evolves one wallet for `config.steps` steps under `policy`.
///
/// Each step is a deposit with probability `config.deposit_probability`,
/// otherwise a payment. A successful payment spends the consumed entries and
/// returns its change to the wallet under the new transaction's hash.
pub fn simulate<P, Env>(
    policy: &P,
    env: &mut Env,
    config: &SimulationConfig,
) -> Result<SimulationReport, SimulationError>
where
    Env: ChainContext<Address = String> + RandomSource,
    P: SelectionPolicy<Env>,
{
    config.validate()?;
    let deposit = Probability::new(config.deposit_probability)?;

    info!(policy = %policy.name(), steps = config.steps, "simulation started");

    let mut wallet = arbitrary_utxo(env, config.initial_utxo_size, config.deposit_range());
    let mut report = SimulationReport {
        wallets: 1,
        ..SimulationReport::identity()
    };

    for step in 0..config.steps {
        if env.coin_toss(deposit) {
            wallet.union(arbitrary_utxo(env, 1, config.deposit_range()));
            report.deposits += 1;
            continue;
        }

        let payments = arbitrary_payments(env, config.payments_per_tx, config.payment_range());
        match policy.select_canonical(env, wallet.clone(), &payments) {
            Ok(outcome) => {
                apply(&mut wallet, &outcome, &payments);
                report.transactions += 1;
                report.stats = report.stats.merge(outcome.stats);
            }
            Err(err) => {
                debug!(step, error = %err, "payment rejected");
                report.hard_errors += 1;
            }
        }
    }

    report.final_utxo_size = wallet.len() as u64;
    report.final_balance = wallet.balance();

    info!(
        policy = %policy.name(),
        transactions = report.transactions,
        hard_errors = report.hard_errors,
        final_utxo_size = report.final_utxo_size,
        "simulation finished"
    );

    Ok(report)
}

/// Spends what `outcome` consumed and credits its change outputs back.
fn apply<H: Ord + Clone>(
    wallet: &mut Utxo<H, String>,
    outcome: &SelectionOutcome<H, String>,
    payments: &[Output<String>],
) {
    wallet.remove_inputs(&outcome.consumed);

    let tx = &outcome.transaction;
    for (index, output) in tx.outputs().iter().enumerate() {
        if payments.iter().any(|p| p.address() == output.address()) {
            continue;
        }
        // Output lists are tiny; the index always fits.
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        wallet.insert(Input::new(tx.hash().clone(), index), output.clone());
    }
}

/// Runs one independent wallet per seed on tokio's blocking pool and merges
/// the reports.
///
/// Each wallet gets its own [`SimEnvironment`] and its own policy from
/// `make_policy`; nothing is shared but the configuration.
pub async fn simulate_many<P, F>(
    config: SimulationConfig,
    seeds: impl IntoIterator<Item = u64>,
    make_policy: F,
) -> Result<SimulationReport, SimulationError>
where
    P: SelectionPolicy<SimEnvironment>,
    F: Fn() -> P + Send + Sync + 'static,
{
    config.validate()?;

    let config = Arc::new(config);
    let make_policy = Arc::new(make_policy);
    let mut tasks = JoinSet::new();

    for seed in seeds {
        let config = Arc::clone(&config);
        let make_policy = Arc::clone(&make_policy);
        tasks.spawn_blocking(move || {
            let mut env = SimEnvironment::seeded(seed);
            let policy = make_policy();
            simulate(&policy, &mut env, &config)
        });
    }

    let mut total = SimulationReport::identity();
    while let Some(joined) = tasks.join_next().await {
        total = total.merge(joined??);
    }
    Ok(total)
}
