//! Exact change/payment ratios.
//!
//! Ratios are kept as reduced fractions rather than floats so they can be
//! multiset keys: equality is exact and ordering is total.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utxo::Value;

/// `change / payment`, stored in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RatioParts")]
pub struct Ratio {
    change: Value,
    payment: Value,
}

impl Ratio {
    /// Builds the ratio of a payment's change to the payment itself.
    /// Returns `None` for a zero payment.
    pub fn new(change: Value, payment: Value) -> Option<Self> {
        if payment == 0 {
            return None;
        }
        let divisor = gcd(change, payment);
        Some(Self {
            change: change / divisor,
            payment: payment / divisor,
        })
    }

    /// Numerator in lowest terms.
    pub fn change(&self) -> Value {
        self.change
    }

    /// Denominator in lowest terms. Never zero.
    pub fn payment(&self) -> Value {
        self.payment
    }

    /// Lossy conversion for reporting.
    pub fn as_f64(&self) -> f64 {
        self.change as f64 / self.payment as f64
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u128::from(self.change) * u128::from(other.payment);
        let rhs = u128::from(other.change) * u128::from(self.payment);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.as_f64())
    }
}

/// Wire shape of a ratio; normalized on the way in.
#[derive(Deserialize)]
struct RatioParts {
    change: Value,
    payment: Value,
}

impl TryFrom<RatioParts> for Ratio {
    type Error = String;

    fn try_from(parts: RatioParts) -> Result<Self, Self::Error> {
        Ratio::new(parts.change, parts.payment).ok_or_else(|| "ratio with zero payment".to_string())
    }
}

fn gcd(mut a: Value, mut b: Value) -> Value {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
