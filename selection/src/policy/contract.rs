//! The outward selection policy contract.
//!
//! Callers see a policy as a function from a UTxO and a list of requested
//! outputs to either a [`SelectionOutcome`] or a [`HardError`]. Soft errors
//! never come out of here: [`InputPolicy`] only wraps strategies whose error
//! type is already `HardError`.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::context::run_policy;
use super::error::HardError;
use super::strategy::SelectionStrategy;
use crate::env::ChainContext;
use crate::stats::TxStats;
use crate::transaction::Transaction;
use crate::utxo::{total_value, Output, Utxo, UtxoRepr, Value};

/// What a successful run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "H: Serialize + Ord, A: Serialize",
    deserialize = "H: Deserialize<'de> + Ord, A: Deserialize<'de>"
))]
pub struct SelectionOutcome<H: Ord, A> {
    /// The assembled transaction.
    pub transaction: Transaction<H, A>,
    /// Finalized statistics of this one transaction.
    pub stats: TxStats,
    /// The entries spent, a sub-mapping of the UTxO the run started with.
    pub consumed: Utxo<H, A>,
}

/// A selection policy, as its callers see it.
pub trait SelectionPolicy<Env: ChainContext> {
    /// The representation this policy wants its UTxO in.
    type Utxo: UtxoRepr<Env::Hash, Env::Address>;

    /// Short human-readable name.
    fn name(&self) -> String;

    /// Selects inputs from `utxo` to cover `outputs`.
    fn select(
        &self,
        env: &mut Env,
        utxo: Self::Utxo,
        outputs: &[Output<Env::Address>],
    ) -> Result<SelectionOutcome<Env::Hash, Env::Address>, HardError>;

    /// Same as [`select`](Self::select), from the canonical form.
    fn select_canonical(
        &self,
        env: &mut Env,
        utxo: Utxo<Env::Hash, Env::Address>,
        outputs: &[Output<Env::Address>],
    ) -> Result<SelectionOutcome<Env::Hash, Env::Address>, HardError> {
        self.select(env, Self::Utxo::from_canonical(utxo), outputs)
    }
}

/// Exposes a `HardError` strategy over representation `U` as a policy.
///
/// The request is checked before the strategy runs, so strategies can
/// assume a non-empty list of non-zero outputs the balance covers.
pub struct InputPolicy<S, U> {
    strategy: S,
    _repr: PhantomData<fn() -> U>,
}

impl<S, U> InputPolicy<S, U> {
    /// Wraps `strategy`; the representation is fixed by `U`.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            _repr: PhantomData,
        }
    }

    /// The wrapped strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl<S: Clone, U> Clone for InputPolicy<S, U> {
    fn clone(&self) -> Self {
        Self::new(self.strategy.clone())
    }
}

impl<S: std::fmt::Debug, U> std::fmt::Debug for InputPolicy<S, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputPolicy")
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl<Env, S, U> SelectionPolicy<Env> for InputPolicy<S, U>
where
    Env: ChainContext,
    U: UtxoRepr<Env::Hash, Env::Address>,
    S: SelectionStrategy<Env, U, Error = HardError>,
{
    type Utxo = U;

    fn name(&self) -> String {
        self.strategy.name()
    }

    fn select(
        &self,
        env: &mut Env,
        utxo: U,
        outputs: &[Output<Env::Address>],
    ) -> Result<SelectionOutcome<Env::Hash, Env::Address>, HardError> {
        if let Err(err) = validate_request(outputs, utxo.balance()) {
            warn!(policy = %self.strategy.name(), error = %err, "selection request rejected");
            return Err(err);
        }
        run_policy(env, utxo, |ctx| self.strategy.run(ctx, outputs))
    }
}

/// Checks a request against the available balance and returns the total
/// requested value.
pub fn validate_request<A>(outputs: &[Output<A>], available: Value) -> Result<Value, HardError> {
    if outputs.is_empty() {
        return Err(HardError::EmptyRequest);
    }
    if let Some(index) = outputs.iter().position(|o| o.value() == 0) {
        return Err(HardError::ZeroValueOutput { index });
    }
    let requested = total_value(outputs).ok_or(HardError::ValueOverflow)?;
    if requested > available {
        return Err(HardError::InsufficientFunds {
            requested,
            available,
        });
    }
    Ok(requested)
}
