//! Random-improve selection.
//!
//! Payments are handled one at a time, largest first. Each payment gets a
//! random draw of inputs until it is covered, followed by an improvement
//! pass that keeps drawing while the selected total moves toward twice the
//! payment (change about equal to the payment) and stays at or below three
//! times the payment.

use rand::seq::SliceRandom;

use super::context::SelectionContext;
use super::error::{SelectionError, SoftError};
use super::strategy::SelectionStrategy;
use crate::env::{ChainContext, RandomSource};
use crate::stats::{Monoid, PartialTxStats};
use crate::utxo::{Input, Output, Utxo, UtxoRepr, Value};

/// Random selection with an improvement pass, capped at `max_inputs`
/// inputs per payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomImprove {
    /// Most inputs one payment may take.
    pub max_inputs: usize,
}

impl RandomImprove {
    /// Random-improve capped at `max_inputs` inputs per payment.
    pub fn new(max_inputs: usize) -> Self {
        Self { max_inputs }
    }

    fn cover<Env, U>(
        &self,
        ctx: &mut SelectionContext<'_, Env, U>,
        payment: &Output<Env::Address>,
    ) -> Result<PartialTxStats, SelectionError>
    where
        Env: ChainContext + RandomSource,
        U: UtxoRepr<Env::Hash, Env::Address>,
    {
        let target = payment.value();

        let mut candidates: Vec<(Input<Env::Hash>, Output<Env::Address>)> =
            ctx.remaining().to_canonical().into_iter().collect();
        ctx.env().run_random(|rng| candidates.shuffle(rng));
        let mut candidates = candidates.into_iter();

        let mut picked = Utxo::new();
        let mut covered: Value = 0;
        while covered < target {
            let Some((input, output)) = candidates.next() else {
                return Err(SoftError::CandidatesExhausted {
                    target,
                    selected: covered,
                }
                .into());
            };
            if picked.len() >= self.max_inputs {
                return Err(SoftError::InputLimitExceeded {
                    payment: target,
                    limit: self.max_inputs,
                }
                .into());
            }
            covered = covered.saturating_add(output.value());
            picked.insert(input, output);
        }

        let ideal = target.saturating_mul(2);
        let upper = target.saturating_mul(3);
        for (input, output) in candidates {
            if picked.len() >= self.max_inputs {
                break;
            }
            let next = covered.saturating_add(output.value());
            if next > upper || next.abs_diff(ideal) >= covered.abs_diff(ideal) {
                break;
            }
            covered = next;
            picked.insert(input, output);
        }

        let inputs = picked.len() as u64;
        ctx.select(picked)?;
        Ok(ctx.settle(std::slice::from_ref(payment), covered, inputs)?)
    }
}

impl<Env, U> SelectionStrategy<Env, U> for RandomImprove
where
    Env: ChainContext + RandomSource,
    U: UtxoRepr<Env::Hash, Env::Address>,
{
    type Error = SelectionError;

    fn name(&self) -> String {
        format!("random-improve(max {})", self.max_inputs)
    }

    fn run(
        &self,
        ctx: &mut SelectionContext<'_, Env, U>,
        outputs: &[Output<Env::Address>],
    ) -> Result<PartialTxStats, SelectionError> {
        let mut payments: Vec<&Output<Env::Address>> = outputs.iter().collect();
        payments.sort_by(|a, b| b.value().cmp(&a.value()));

        let mut stats = PartialTxStats::identity();
        for payment in payments {
            stats = stats.merge(self.cover(ctx, payment)?);
        }
        Ok(stats)
    }
}
