//! Error types for input selection.
//!
//! Two tiers. A [`HardError`] says the request cannot be met; it always
//! reaches the caller. A [`SoftError`] says one strategy gave up; it is
//! caught by [`SelectionContext::catch_soft`](super::SelectionContext::catch_soft)
//! and another strategy gets a turn. [`SelectionError`] is their union, used
//! inside the engine only.

use thiserror::Error;

use crate::utxo::Value;

/// The request is unsatisfiable (or malformed) for the UTxO at hand.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HardError {
    /// Total available balance is below the total requested.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Sum of the requested outputs.
        requested: Value,
        /// Value available to cover them.
        available: Value,
    },

    /// No outputs were requested.
    #[error("no outputs requested")]
    EmptyRequest,

    /// A requested output carries no value.
    #[error("requested output {index} has zero value")]
    ZeroValueOutput {
        /// Position of the output in the request.
        index: usize,
    },

    /// The requested outputs sum past `Value::MAX`.
    #[error("requested outputs overflow the value range")]
    ValueOverflow,

    /// A strategy tried to spend entries that are not in the remaining UTxO.
    #[error("{missing} of {requested} inputs are not in the remaining UTxO")]
    InputNotAvailable {
        /// Entries the strategy tried to commit.
        requested: usize,
        /// How many of them were not available.
        missing: usize,
    },

    /// A strategy tried to spend an entry under an output other than the
    /// one the remaining UTxO holds for it.
    #[error("{mismatched} of {requested} inputs carry an output that differs from the UTxO")]
    OutputMismatch {
        /// Entries the strategy tried to commit.
        requested: usize,
        /// How many of them named the wrong output.
        mismatched: usize,
    },
}

/// One strategy failed; another might still succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SoftError {
    /// Covering a payment would take more inputs than the strategy allows.
    #[error("payment of {payment} needs more than {limit} inputs")]
    InputLimitExceeded {
        /// The payment being covered.
        payment: Value,
        /// The strategy's input cap.
        limit: usize,
    },

    /// The strategy drew every candidate without covering its target.
    #[error("candidates exhausted: selected {selected} toward {target}")]
    CandidatesExhausted {
        /// Value the strategy was trying to reach.
        target: Value,
        /// Value it had reached when it ran out.
        selected: Value,
    },
}

/// Either tier. Never crosses the outward policy boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Unrecoverable.
    #[error(transparent)]
    Hard(#[from] HardError),

    /// Recoverable by switching strategy.
    #[error(transparent)]
    Soft(#[from] SoftError),
}

impl SelectionError {
    /// Returns `true` for the hard tier.
    pub fn is_hard(&self) -> bool {
        matches!(self, Self::Hard(_))
    }

    /// Returns `true` for the soft tier.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::Soft(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_errors_convert_into_union() {
        let err: SelectionError = HardError::EmptyRequest.into();
        assert!(err.is_hard());
        assert!(!err.is_soft());
    }

    #[test]
    fn soft_errors_convert_into_union() {
        let err: SelectionError = SoftError::InputLimitExceeded {
            payment: 10,
            limit: 2,
        }
        .into();
        assert!(err.is_soft());
    }

    #[test]
    fn messages_are_transparent() {
        let err = SelectionError::from(HardError::InsufficientFunds {
            requested: 100,
            available: 5,
        });
        assert_eq!(
            err.to_string(),
            "insufficient funds: requested 100, available 5"
        );
    }
}
