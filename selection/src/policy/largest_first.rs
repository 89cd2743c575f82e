//! Largest-first selection.

use super::context::SelectionContext;
use super::error::HardError;
use super::strategy::SelectionStrategy;
use crate::env::ChainContext;
use crate::stats::PartialTxStats;
use crate::utxo::{total_value, Output, SortedUtxo, Utxo, Value};

/// Spends the largest entries first until every requested output is
/// covered, then emits the payments and a single change output.
///
/// Equal values are taken largest input reference first. With enough total
/// balance this never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestFirst;

impl<Env: ChainContext> SelectionStrategy<Env, SortedUtxo<Env::Hash, Env::Address>>
    for LargestFirst
{
    type Error = HardError;

    fn name(&self) -> String {
        "largest-first".into()
    }

    fn run(
        &self,
        ctx: &mut SelectionContext<'_, Env, SortedUtxo<Env::Hash, Env::Address>>,
        outputs: &[Output<Env::Address>],
    ) -> Result<PartialTxStats, HardError> {
        let target = total_value(outputs).ok_or(HardError::ValueOverflow)?;

        let mut picked = Utxo::new();
        let mut covered: Value = 0;
        for (input, output) in ctx.remaining().iter_descending() {
            if covered >= target {
                break;
            }
            covered = covered.saturating_add(output.value());
            picked.insert(input.clone(), output.clone());
        }

        if covered < target {
            return Err(HardError::InsufficientFunds {
                requested: target,
                available: covered,
            });
        }

        let inputs = picked.len() as u64;
        ctx.select(picked)?;
        ctx.settle(outputs, covered, inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{CounterContext, TxHash};
    use crate::policy::{InputPolicy, SelectionPolicy};
    use crate::utxo::{Input, UtxoRepr};

    fn wallet(env: &mut CounterContext, values: &[Value]) -> SortedUtxo<TxHash, String> {
        let canonical: Utxo<TxHash, String> = values
            .iter()
            .map(|v| (Input::new(env.fresh_hash(), 0), Output::new("me".into(), *v)))
            .collect();
        SortedUtxo::from_canonical(canonical)
    }

    fn policy() -> InputPolicy<LargestFirst, SortedUtxo<TxHash, String>> {
        InputPolicy::new(LargestFirst)
    }

    #[test]
    fn takes_largest_until_covered() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20, 30]);
        let policy = policy();

        let outcome = policy
            .select(&mut env, utxo, &[Output::new("bob".into(), 25)])
            .expect("covered");

        assert_eq!(outcome.consumed.output_values(), vec![30]);
        let values: Vec<Value> = outcome.transaction.outputs().iter().map(|o| o.value()).collect();
        assert_eq!(values, vec![25, 5]);
        assert_eq!(outcome.stats.input_counts.count(1), 1);
    }

    #[test]
    fn covers_all_payments_with_one_change_output() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20, 30]);
        let policy = policy();
        let payments = [Output::new("bob".into(), 15), Output::new("eve".into(), 20)];

        let outcome = policy.select(&mut env, utxo, &payments).expect("covered");

        assert_eq!(outcome.consumed.balance(), 50);
        assert_eq!(outcome.transaction.outputs().len(), 3);
        assert_eq!(outcome.transaction.outputs()[2].value(), 15);
        assert_eq!(outcome.stats.ratios.len(), 1);
    }

    #[test]
    fn exact_cover_emits_no_change() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[10, 20, 30]);
        let policy = policy();

        let outcome = policy
            .select(&mut env, utxo, &[Output::new("bob".into(), 50)])
            .expect("covered");

        assert_eq!(outcome.transaction.outputs().len(), 1);
        assert_eq!(env.addresses_issued(), 0);
    }

    #[test]
    fn insufficient_balance_is_hard() {
        let mut env = CounterContext::new();
        let utxo = wallet(&mut env, &[5]);
        let policy = policy();

        let err = policy
            .select(&mut env, utxo, &[Output::new("bob".into(), 100)])
            .unwrap_err();

        assert_eq!(
            err,
            HardError::InsufficientFunds {
                requested: 100,
                available: 5
            }
        );
    }
}
