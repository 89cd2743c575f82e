//! Working state of one selection run.

use tracing::trace;

use super::error::HardError;
use crate::utxo::{Output, Utxo, UtxoRepr};

/// Remaining UTxO, committed inputs and generated outputs.
///
/// Between transitions the committed inputs and the remaining domain are
/// disjoint, and together they cover the domain the run started with.
/// [`commit`](Self::commit) is the only transition that touches either, and
/// it moves entries from one side to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState<H: Ord, A, U> {
    remaining: U,
    selected: Utxo<H, A>,
    generated: Vec<Output<A>>,
}

impl<H, A, U> SelectionState<H, A, U>
where
    H: Ord + Clone,
    A: Clone,
    U: UtxoRepr<H, A>,
{
    /// Fresh state: everything remaining, nothing selected or generated.
    pub fn new(utxo: U) -> Self {
        Self {
            remaining: utxo,
            selected: Utxo::new(),
            generated: Vec::new(),
        }
    }

    /// Entries still available.
    pub fn remaining(&self) -> &U {
        &self.remaining
    }

    /// Entries committed as inputs so far.
    pub fn selected(&self) -> &Utxo<H, A> {
        &self.selected
    }

    /// Payment and change outputs generated so far.
    pub fn generated(&self) -> &[Output<A>] {
        &self.generated
    }

    /// Moves `entries` from the remaining UTxO into the committed inputs.
    ///
    /// Every entry must be in the remaining UTxO with exactly the output
    /// held there. Otherwise nothing changes and the commit fails.
    pub(crate) fn commit(&mut self, entries: Utxo<H, A>) -> Result<(), HardError>
    where
        A: PartialEq,
    {
        let mut missing = 0;
        let mut mismatched = 0;
        for (input, output) in &entries {
            match self.remaining.lookup(input) {
                None => missing += 1,
                Some(held) if held != output => mismatched += 1,
                Some(_) => {}
            }
        }

        if missing > 0 {
            return Err(HardError::InputNotAvailable {
                requested: entries.len(),
                missing,
            });
        }
        if mismatched > 0 {
            return Err(HardError::OutputMismatch {
                requested: entries.len(),
                mismatched,
            });
        }

        trace!(count = entries.len(), value = entries.balance(), "inputs committed");
        self.remaining.remove_inputs(&entries);
        self.selected.union(entries);
        Ok(())
    }

    /// Appends a generated output.
    pub(crate) fn push_output(&mut self, output: Output<A>) {
        self.generated.push(output);
    }

    /// Splits the state into remaining UTxO, committed inputs and outputs.
    pub fn into_parts(self) -> (U, Utxo<H, A>, Vec<Output<A>>) {
        (self.remaining, self.selected, self.generated)
    }
}
