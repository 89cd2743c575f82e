//! Strategies: the heuristics that run inside a [`SelectionContext`].
//!
//! A strategy picks inputs and emits outputs through the context. Its error
//! type decides what it may fail with: `HardError` for strategies that only
//! fail when the request is unsatisfiable, `SelectionError` for strategies
//! that can also give up. Only `HardError` strategies can be exposed through
//! [`InputPolicy`](super::InputPolicy); [`Fallback`] is how a
//! `SelectionError` strategy gets there.

use std::fmt;

use super::context::SelectionContext;
use super::error::{HardError, SelectionError};
use crate::env::ChainContext;
use crate::stats::PartialTxStats;
use crate::utxo::{Output, UtxoRepr};

/// A selection heuristic over the representation `U`.
pub trait SelectionStrategy<Env, U>
where
    Env: ChainContext,
    U: UtxoRepr<Env::Hash, Env::Address>,
{
    /// What the strategy can fail with. Hard errors always fit.
    type Error: From<HardError> + fmt::Debug;

    /// Short human-readable name, for logs and reports.
    fn name(&self) -> String;

    /// Covers `outputs` from the context's remaining UTxO.
    fn run(
        &self,
        ctx: &mut SelectionContext<'_, Env, U>,
        outputs: &[Output<Env::Address>],
    ) -> Result<PartialTxStats, Self::Error>;
}

/// Runs `primary`; if it fails softly, runs `fallback` from the state
/// `primary` started with.
///
/// The error type is the fallback's, so a `HardError` fallback turns the
/// pair into a `HardError` strategy.
#[derive(Debug, Clone)]
pub struct Fallback<A, B> {
    primary: A,
    fallback: B,
}

impl<A, B> Fallback<A, B> {
    /// Pairs a strategy with the one that takes over on soft failure.
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }

    /// The strategy tried first.
    pub fn primary(&self) -> &A {
        &self.primary
    }

    /// The strategy run after a soft failure.
    pub fn fallback(&self) -> &B {
        &self.fallback
    }
}

impl<Env, U, A, B> SelectionStrategy<Env, U> for Fallback<A, B>
where
    Env: ChainContext,
    U: UtxoRepr<Env::Hash, Env::Address>,
    A: SelectionStrategy<Env, U, Error = SelectionError>,
    B: SelectionStrategy<Env, U>,
{
    type Error = B::Error;

    fn name(&self) -> String {
        format!("{} / {}", self.primary.name(), self.fallback.name())
    }

    fn run(
        &self,
        ctx: &mut SelectionContext<'_, Env, U>,
        outputs: &[Output<Env::Address>],
    ) -> Result<PartialTxStats, B::Error> {
        ctx.catch_soft(
            |ctx| self.primary.run(ctx, outputs),
            |ctx, _| self.fallback.run(ctx, outputs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{CounterContext, TxHash};
    use crate::policy::error::SoftError;
    use crate::utxo::{Input, Utxo};

    type Repr = Utxo<TxHash, String>;

    /// Grabs the first remaining entry, then gives up softly.
    struct GrabAndGiveUp;

    impl SelectionStrategy<CounterContext, Repr> for GrabAndGiveUp {
        type Error = SelectionError;

        fn name(&self) -> String {
            "grab".into()
        }

        fn run(
            &self,
            ctx: &mut SelectionContext<'_, CounterContext, Repr>,
            _: &[Output<String>],
        ) -> Result<PartialTxStats, SelectionError> {
            let first: Repr = ctx
                .remaining()
                .iter()
                .take(1)
                .map(|(i, o)| (i.clone(), o.clone()))
                .collect();
            ctx.select(first)?;
            Err(SoftError::CandidatesExhausted {
                target: 1,
                selected: 0,
            }
            .into())
        }
    }

    /// Spends everything.
    struct SpendAll;

    impl SelectionStrategy<CounterContext, Repr> for SpendAll {
        type Error = HardError;

        fn name(&self) -> String {
            "all".into()
        }

        fn run(
            &self,
            ctx: &mut SelectionContext<'_, CounterContext, Repr>,
            outputs: &[Output<String>],
        ) -> Result<PartialTxStats, HardError> {
            let all = ctx.remaining().clone();
            let covered = all.balance();
            let count = all.len() as u64;
            ctx.select(all)?;
            ctx.settle(outputs, covered, count)
        }
    }

    #[test]
    fn fallback_runs_from_pre_primary_state() {
        let mut env = CounterContext::new();
        let utxo: Repr = (0..3)
            .map(|v| (Input::new(env.fresh_hash(), 0), Output::new("me".into(), 10 + v)))
            .collect();
        let mut ctx = SelectionContext::new(&mut env, utxo);
        let strategy = Fallback::new(GrabAndGiveUp, SpendAll);

        let stats = strategy
            .run(&mut ctx, &[Output::new("bob".into(), 20)])
            .expect("fallback covers");

        assert_eq!(stats.input_count, 3);
        assert_eq!(ctx.state().selected().len(), 3);
        assert!(ctx.remaining().is_empty());
        assert_eq!(
            SelectionStrategy::<CounterContext, Repr>::name(&strategy),
            "grab / all"
        );
    }
}
