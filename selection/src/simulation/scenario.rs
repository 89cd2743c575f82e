//! Random wallets and payment requests.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::env::{encode_address, ChainContext, RandomSource};
use crate::utxo::{Input, Output, Utxo, Value};

/// Highest output index a generated entry can sit at.
const MAX_OUTPUT_INDEX: u32 = 3;

/// A wallet of `size` entries with values drawn uniformly from `values`.
///
/// Each entry gets a fresh transaction hash and is owned by a fresh change
/// address, as if the wallet had received it from an earlier transaction.
pub fn arbitrary_utxo<Env>(
    env: &mut Env,
    size: usize,
    values: RangeInclusive<Value>,
) -> Utxo<Env::Hash, Env::Address>
where
    Env: ChainContext + RandomSource,
{
    let mut utxo = Utxo::new();
    for _ in 0..size {
        let value = env.run_random(|rng| rng.gen_range(values.clone()));
        let index = env.run_random(|rng| rng.gen_range(0..=MAX_OUTPUT_INDEX));
        let input = Input::new(env.fresh_hash(), index);
        let address = env.fresh_change_address();
        utxo.insert(input, Output::new(address, value));
    }
    utxo
}

/// `count` payments to random external addresses, values uniform over
/// `values`.
pub fn arbitrary_payments<R: RandomSource>(
    random: &mut R,
    count: usize,
    values: RangeInclusive<Value>,
) -> Vec<Output<String>> {
    (0..count)
        .map(|_| {
            let value = random.run_random(|rng| rng.gen_range(values.clone()));
            Output::new(random_address(random), value)
        })
        .collect()
}

/// A Bech32 address over 32 random bytes.
pub fn random_address<R: RandomSource>(random: &mut R) -> String {
    let payload: [u8; 32] = random.run_random(|rng| rng.gen());
    encode_address(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{SeededRandom, SimEnvironment};

    #[test]
    fn utxo_has_requested_size_and_range() {
        let mut env = SimEnvironment::seeded(5);
        let utxo = arbitrary_utxo(&mut env, 50, 10..=20);
        assert_eq!(utxo.len(), 50);
        assert!(utxo.output_values().iter().all(|v| (10..=20).contains(v)));
    }

    #[test]
    fn empty_wallet_is_allowed() {
        let mut env = SimEnvironment::seeded(5);
        assert!(arbitrary_utxo(&mut env, 0, 1..=1).is_empty());
    }

    #[test]
    fn payments_go_to_distinct_addresses() {
        let mut random = SeededRandom::from_seed(9);
        let payments = arbitrary_payments(&mut random, 16, 1..=5);
        assert_eq!(payments.len(), 16);
        assert!(payments.iter().all(|p| (1..=5).contains(&p.value())));

        let mut addresses: Vec<&String> = payments.iter().map(|p| p.address()).collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), 16);
    }

    #[test]
    fn scenarios_are_reproducible() {
        let a = arbitrary_utxo(&mut SimEnvironment::seeded(77), 8, 1..=1_000);
        let b = arbitrary_utxo(&mut SimEnvironment::seeded(77), 8, 1..=1_000);
        assert_eq!(a, b);
    }
}
