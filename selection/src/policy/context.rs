//! The execution context policies run in.
//!
//! A policy is a closure over `&mut SelectionContext` returning
//! `Result<PartialTxStats, E>`. The context threads the selection state,
//! hands out environment capabilities, and enforces one rule:
//!
//! **State changes survive only if the computation that made them succeeds.**
//!
//! [`attempt`](SelectionContext::attempt) snapshots the state, runs a
//! sub-computation, and restores the snapshot if it fails. Every combinator
//! here is built on it, so nested attempts and soft-error recovery all see
//! the state as it was before the failed piece began.
//!
//! Environment effects (fresh addresses and hashes) are not rolled back. An
//! identifier drawn by a failed attempt is simply never used.

use tracing::debug;

use super::contract::SelectionOutcome;
use super::error::{HardError, SelectionError, SoftError};
use super::state::SelectionState;
use crate::env::ChainContext;
use crate::stats::PartialTxStats;
use crate::transaction::Transaction;
use crate::utxo::{total_value, Output, Utxo, UtxoRepr, Value};

/// Selection state plus the environment, for the duration of one run.
pub struct SelectionContext<'env, Env: ChainContext, U> {
    env: &'env mut Env,
    state: SelectionState<Env::Hash, Env::Address, U>,
}

impl<'env, Env, U> SelectionContext<'env, Env, U>
where
    Env: ChainContext,
    U: UtxoRepr<Env::Hash, Env::Address>,
{
    /// Starts a run over `utxo` with nothing selected.
    pub fn new(env: &'env mut Env, utxo: U) -> Self {
        Self {
            env,
            state: SelectionState::new(utxo),
        }
    }

    /// Current selection state.
    pub fn state(&self) -> &SelectionState<Env::Hash, Env::Address, U> {
        &self.state
    }

    /// Entries still available for selection.
    pub fn remaining(&self) -> &U {
        self.state.remaining()
    }

    /// The environment, for capabilities beyond fresh identifiers
    /// (randomness, typically).
    pub fn env(&mut self) -> &mut Env {
        self.env
    }

    /// Commits `entries` as inputs. See [`SelectionState::commit`].
    pub fn select(&mut self, entries: Utxo<Env::Hash, Env::Address>) -> Result<(), HardError> {
        self.state.commit(entries)
    }

    /// Appends a generated output.
    pub fn emit(&mut self, output: Output<Env::Address>) {
        self.state.push_output(output);
    }

    /// A change address nobody has used.
    pub fn fresh_change_address(&mut self) -> Env::Address {
        self.env.fresh_change_address()
    }

    /// Emits `payments`, plus one change output for whatever `covered`
    /// leaves over, and returns the partial statistics of the step:
    /// `inputs` inputs and one change/payment ratio.
    pub fn settle(
        &mut self,
        payments: &[Output<Env::Address>],
        covered: Value,
        inputs: u64,
    ) -> Result<PartialTxStats, HardError> {
        let requested = total_value(payments).ok_or(HardError::ValueOverflow)?;
        let change = covered
            .checked_sub(requested)
            .ok_or(HardError::InsufficientFunds {
                requested,
                available: covered,
            })?;

        for payment in payments {
            self.emit(payment.clone());
        }
        if change > 0 {
            let address = self.fresh_change_address();
            self.emit(Output::new(address, change));
        }

        Ok(PartialTxStats::for_payment(inputs, change, requested))
    }

    /// Runs `f` transactionally: on error, the state is restored to what it
    /// was before `f` started.
    pub fn attempt<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let snapshot = self.state.clone();
        let result = f(self);
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    /// Runs `action`; if it fails softly, runs `handler` from the state as
    /// it was before `action` started.
    ///
    /// Hard errors from `action` propagate unchanged (converted into `E`).
    /// Success from `action` is returned as is, state included. The
    /// handler's error type is the result's error type, so a handler that
    /// can only fail hard narrows `SelectionError` down to `HardError`.
    pub fn catch_soft<T, E, F, G>(&mut self, action: F, handler: G) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, SelectionError>,
        G: FnOnce(&mut Self, SoftError) -> Result<T, E>,
        E: From<HardError>,
    {
        match self.attempt(action) {
            Ok(value) => Ok(value),
            Err(SelectionError::Hard(err)) => Err(E::from(err)),
            Err(SelectionError::Soft(err)) => {
                debug!(error = %err, "soft failure caught, running handler");
                handler(self, err)
            }
        }
    }

    /// Runs `f` transactionally and maps its error with `map`.
    pub fn map_error<T, E, E2, F, M>(&mut self, f: F, map: M) -> Result<T, E2>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        M: FnOnce(E) -> E2,
    {
        self.attempt(f).map_err(map)
    }

    fn finish(self) -> (&'env mut Env, SelectionState<Env::Hash, Env::Address, U>) {
        (self.env, self.state)
    }
}

/// Executes `policy` from a fresh state over `utxo`.
///
/// On success, draws a fresh hash from the environment, assembles the
/// transaction from the committed inputs and generated outputs, and
/// finalizes the partial statistics. On failure, the error comes back
/// unchanged and no transaction exists.
pub fn run_policy<Env, U, E, F>(
    env: &mut Env,
    utxo: U,
    policy: F,
) -> Result<SelectionOutcome<Env::Hash, Env::Address>, E>
where
    Env: ChainContext,
    U: UtxoRepr<Env::Hash, Env::Address>,
    F: FnOnce(&mut SelectionContext<'_, Env, U>) -> Result<PartialTxStats, E>,
{
    let mut ctx = SelectionContext::new(env, utxo);
    let partial = policy(&mut ctx)?;

    let (env, state) = ctx.finish();
    let (_, consumed, outputs) = state.into_parts();
    let hash = env.fresh_hash();
    let inputs = consumed.inputs().cloned().collect();
    let transaction = Transaction::assemble(inputs, outputs, hash);

    debug!(
        inputs = consumed.len(),
        outputs = transaction.outputs().len(),
        consumed_value = consumed.balance(),
        "selection run completed"
    );

    Ok(SelectionOutcome {
        transaction,
        stats: partial.finalize(),
        consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::CounterContext;
    use crate::stats::Ratio;
    use crate::utxo::Input;

    type Ctx<'e> = SelectionContext<'e, CounterContext, Utxo<crate::env::TxHash, String>>;

    fn wallet(env: &mut CounterContext, values: &[Value]) -> Utxo<crate::env::TxHash, String> {
        values
            .iter()
            .map(|v| (Input::new(env.fresh_hash(), 0), Output::new("me".to_string(), *v)))
            .collect()
    }

    fn first_entry(ctx: &Ctx<'_>) -> Utxo<crate::env::TxHash, String> {
        ctx.remaining()
            .iter()
            .take(1)
            .map(|(i, o)| (i.clone(), o.clone()))
            .collect()
    }

    fn soft() -> SelectionError {
        SoftError::CandidatesExhausted {
            target: 1,
            selected: 0,
        }
        .into()
    }

    #[test]
    fn attempt_rolls_back_on_error() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20]);
        let mut ctx = SelectionContext::new(&mut env, utxo);
        let before = ctx.state().clone();

        let result: Result<(), SelectionError> = ctx.attempt(|ctx| {
            let entry = first_entry(ctx);
            ctx.select(entry)?;
            ctx.emit(Output::new("bob".to_string(), 5));
            Err(soft())
        });

        assert!(result.is_err());
        assert_eq!(ctx.state(), &before);
    }

    #[test]
    fn attempt_keeps_state_on_success() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20]);
        let mut ctx = SelectionContext::new(&mut env, utxo);

        let result: Result<(), SelectionError> = ctx.attempt(|ctx| {
            let entry = first_entry(ctx);
            ctx.select(entry)?;
            Ok(())
        });

        assert!(result.is_ok());
        assert_eq!(ctx.state().selected().len(), 1);
    }

    #[test]
    fn nested_failure_only_rolls_back_inner_part() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20, 30]);
        let mut ctx = SelectionContext::new(&mut env, utxo);

        let result: Result<(), SelectionError> = ctx.attempt(|ctx| {
            let entry = first_entry(ctx);
            ctx.select(entry)?;
            let inner: Result<(), SelectionError> = ctx.attempt(|ctx| {
                let entry = first_entry(ctx);
                ctx.select(entry)?;
                Err(soft())
            });
            assert!(inner.is_err());
            Ok(())
        });

        assert!(result.is_ok());
        assert_eq!(ctx.state().selected().len(), 1);
        assert_eq!(ctx.remaining().len(), 2);
    }

    #[test]
    fn catch_soft_handler_starts_from_pre_action_state() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20, 30]);
        let mut ctx = SelectionContext::new(&mut env, utxo);
        let before = ctx.state().clone();

        let result: Result<usize, HardError> = ctx.catch_soft(
            |ctx| {
                let entry = first_entry(ctx);
                ctx.select(entry)?;
                Err(soft())
            },
            |ctx, _| Ok(ctx.state().selected().len()),
        );

        assert_eq!(result, Ok(0));
        assert_eq!(ctx.state(), &before);
    }

    #[test]
    fn catch_soft_passes_hard_errors_through() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10]);
        let mut ctx = SelectionContext::new(&mut env, utxo);
        let mut handler_ran = false;

        let result: Result<(), SelectionError> = ctx.catch_soft(
            |_| Err(HardError::EmptyRequest.into()),
            |_, _| {
                handler_ran = true;
                Ok(())
            },
        );

        assert_eq!(result, Err(SelectionError::Hard(HardError::EmptyRequest)));
        assert!(!handler_ran);
    }

    #[test]
    fn attempt_rolls_back_after_hard_error() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20]);
        let mut ctx = SelectionContext::new(&mut env, utxo);
        let before = ctx.state().clone();

        let result: Result<(), HardError> = ctx.attempt(|ctx| {
            let entry = first_entry(ctx);
            ctx.select(entry)?;
            ctx.emit(Output::new("bob".to_string(), 5));
            Err(HardError::InsufficientFunds {
                requested: 50,
                available: 10,
            })
        });

        assert!(result.is_err());
        assert_eq!(ctx.state(), &before);
    }

    #[test]
    fn catch_soft_restores_state_before_passing_hard_error() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20, 30]);
        let mut ctx = SelectionContext::new(&mut env, utxo);
        let before = ctx.state().clone();
        let mut handler_ran = false;

        let result: Result<(), HardError> = ctx.catch_soft(
            |ctx| {
                let entry = first_entry(ctx);
                ctx.select(entry)?;
                ctx.emit(Output::new("bob".to_string(), 5));
                Err(HardError::EmptyRequest.into())
            },
            |_, _| {
                handler_ran = true;
                Ok(())
            },
        );

        assert_eq!(result, Err(HardError::EmptyRequest));
        assert!(!handler_ran);
        assert_eq!(ctx.state(), &before);
    }

    #[test]
    fn select_refuses_an_altered_output() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10]);

        let result = run_policy(&mut env, utxo, |ctx| {
            let inflated: Utxo<crate::env::TxHash, String> = ctx
                .remaining()
                .iter()
                .map(|(i, _)| (i.clone(), Output::new("me".to_string(), 1_000)))
                .collect();
            ctx.select(inflated)?;
            ctx.settle(&[Output::new("bob".to_string(), 900)], 1_000, 1)
        });

        assert_eq!(
            result,
            Err(HardError::OutputMismatch {
                requested: 1,
                mismatched: 1
            })
        );
    }

    #[test]
    fn catch_soft_keeps_successful_action_state() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20]);
        let mut ctx = SelectionContext::new(&mut env, utxo);

        let result: Result<(), HardError> = ctx.catch_soft(
            |ctx| {
                let entry = first_entry(ctx);
                ctx.select(entry)?;
                Ok(())
            },
            |_, _| panic!("handler must not run"),
        );

        assert!(result.is_ok());
        assert_eq!(ctx.state().selected().len(), 1);
    }

    #[test]
    fn map_error_converts_without_touching_success() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10]);
        let mut ctx = SelectionContext::new(&mut env, utxo);

        let failed: Result<(), String> = ctx.map_error(|_| Err(soft()), |e| e.to_string());
        assert_eq!(
            failed,
            Err("candidates exhausted: selected 0 toward 1".to_string())
        );

        let ok: Result<u8, String> =
            ctx.map_error(|_| Ok::<u8, SelectionError>(7), |e| e.to_string());
        assert_eq!(ok, Ok(7));
    }

    #[test]
    fn settle_emits_change_only_when_needed() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10]);
        let mut ctx = SelectionContext::new(&mut env, utxo);
        let payment = [Output::new("bob".to_string(), 25)];

        let exact = ctx.settle(&payment, 25, 1).expect("covered");
        assert_eq!(ctx.state().generated().len(), 1);
        assert_eq!(exact.ratios.count(&Ratio::new(0, 1).expect("ratio")), 1);

        let with_change = ctx.settle(&payment, 30, 2).expect("covered");
        assert_eq!(ctx.state().generated().len(), 3);
        assert_eq!(ctx.state().generated()[2].value(), 5);
        assert_eq!(with_change.input_count, 2);

        assert!(ctx.settle(&payment, 20, 1).is_err());
    }

    #[test]
    fn run_policy_assembles_transaction() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20, 30]);
        let hashes_before = env.hashes_issued();

        let outcome = run_policy(&mut env, utxo.clone(), |ctx| {
            let entry = first_entry(ctx);
            let value = entry.balance();
            ctx.select(entry)?;
            ctx.settle(&[Output::new("bob".to_string(), 4)], value, 1)
        })
        .expect("policy succeeds");

        assert_eq!(env.hashes_issued(), hashes_before + 1);
        assert_eq!(outcome.transaction.fee(), 0);
        assert!(outcome.transaction.extra().is_empty());
        assert_eq!(outcome.transaction.inputs().len(), 1);
        assert!(outcome.consumed.is_submap_of(&utxo));
        assert_eq!(outcome.stats.input_counts.count(1), 1);
        assert_eq!(outcome.stats.transactions(), 1);
    }

    #[test]
    fn run_policy_propagates_errors_without_minting_hash() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10]);
        let hashes_before = env.hashes_issued();

        let result = run_policy(&mut env, utxo, |_| {
            Err::<PartialTxStats, _>(HardError::EmptyRequest)
        });

        assert_eq!(result, Err(HardError::EmptyRequest));
        assert_eq!(env.hashes_issued(), hashes_before);
    }
}
