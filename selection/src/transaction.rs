//! The transaction a successful selection run produces.
//!
//! A [`Transaction`] is assembled exactly once, at the end of a successful
//! run, from the committed inputs and the generated outputs. Fields are
//! private and there are no setters: what the engine built is what the
//! caller gets.

use serde::{Deserialize, Serialize};

use crate::config::FEE;
use crate::utxo::{total_value, Input, Output, Value};

/// Consumed inputs, produced outputs, fee, identifying hash and auxiliary
/// data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction<H, A> {
    inputs: Vec<Input<H>>,
    outputs: Vec<Output<A>>,
    fee: Value,
    hash: H,
    extra: Vec<String>,
}

impl<H, A> Transaction<H, A> {
    /// Assembles a transaction with the engine's fixed fee and no auxiliary
    /// data.
    pub(crate) fn assemble(inputs: Vec<Input<H>>, outputs: Vec<Output<A>>, hash: H) -> Self {
        Self {
            inputs,
            outputs,
            fee: FEE,
            hash,
            extra: Vec::new(),
        }
    }

    /// Inputs spent, in canonical input order.
    pub fn inputs(&self) -> &[Input<H>] {
        &self.inputs
    }

    /// Outputs produced: payments first, change interleaved after the
    /// payment it belongs to.
    pub fn outputs(&self) -> &[Output<A>] {
        &self.outputs
    }

    /// Fee paid. Always [`FEE`].
    pub fn fee(&self) -> Value {
        self.fee
    }

    /// Identifying hash, minted by the environment.
    pub fn hash(&self) -> &H {
        &self.hash
    }

    /// Auxiliary data. Always empty.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    /// Total value of the produced outputs, `None` on overflow.
    pub fn output_total(&self) -> Option<Value> {
        total_value(&self.outputs)
    }
}
