//! Value, input and output types.
//!
//! These are generic over the hash type `H` (what identifies a transaction)
//! and the address type `A` (who owns an output). The engine never looks
//! inside either; it only needs to order, compare and clone them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Amounts in the smallest unit (photons). No floating point near money.
pub type Value = u64;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Reference to a previously produced output: the producing transaction's
/// hash plus the output's position in that transaction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Input<H> {
    /// Hash of the transaction that produced the output.
    pub tx_hash: H,
    /// Position of the output within that transaction.
    pub index: u32,
}

impl<H> Input<H> {
    /// Creates an input reference.
    pub fn new(tx_hash: H, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

impl<H: fmt::Display> fmt::Display for Input<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A value assigned to an address.
///
/// Fields are private: an output is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Output<A> {
    address: A,
    value: Value,
}

impl<A> Output<A> {
    /// Creates an output paying `value` to `address`.
    pub fn new(address: A, value: Value) -> Self {
        Self { address, value }
    }

    /// The receiving address.
    pub fn address(&self) -> &A {
        &self.address
    }

    /// The amount, in photons.
    pub fn value(&self) -> Value {
        self.value
    }
}

/// Sums output values, returning `None` on overflow.
pub fn total_value<'a, A: 'a>(outputs: impl IntoIterator<Item = &'a Output<A>>) -> Option<Value> {
    outputs
        .into_iter()
        .try_fold(0, |acc: Value, out| acc.checked_add(out.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_order_by_hash_then_index() {
        let a = Input::new(1u32, 5);
        let b = Input::new(2u32, 0);
        let c = Input::new(2u32, 1);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn input_display() {
        assert_eq!(Input::new("abcd", 3).to_string(), "abcd:3");
    }

    #[test]
    fn total_value_sums() {
        let outs = vec![Output::new("a", 10), Output::new("b", 32)];
        assert_eq!(total_value(&outs), Some(42));
    }

    #[test]
    fn total_value_detects_overflow() {
        let outs = vec![Output::new("a", Value::MAX), Output::new("b", 1)];
        assert_eq!(total_value(&outs), None);
    }

    #[test]
    fn total_value_of_nothing_is_zero() {
        let outs: Vec<Output<&str>> = Vec::new();
        assert_eq!(total_value(&outs), Some(0));
    }
}
